//! Environment variable names for planner configuration
//!
//! Centralized constants keep the variable names consistent between the
//! settings loader and the documentation.

/// Active provider selection ("dashscope" or "openai").
pub const TRIP_LLM_PROVIDER: &str = "TRIP_LLM_PROVIDER";

/// Model override applied to whichever provider is active.
pub const TRIP_LLM_MODEL: &str = "TRIP_LLM_MODEL";

/// DashScope API key (compatible-mode endpoint).
pub const DASHSCOPE_API_KEY: &str = "DASHSCOPE_API_KEY";

/// DashScope custom base URL.
pub const DASHSCOPE_BASE_URL: &str = "DASHSCOPE_BASE_URL";

/// OpenAI API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// OpenAI custom base URL.
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// All recognized keys, for validation and docs.
pub const ALL_KEYS: &[&str] = &[
    TRIP_LLM_PROVIDER,
    TRIP_LLM_MODEL,
    DASHSCOPE_API_KEY,
    DASHSCOPE_BASE_URL,
    OPENAI_API_KEY,
    OPENAI_BASE_URL,
];
