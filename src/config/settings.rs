use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::keys;
use crate::api::{PlannerError, PlannerResult};

/// Supported LLM providers, each carrying its own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Alibaba DashScope via its OpenAI-compatible endpoint.
    #[default]
    Dashscope,
    /// OpenAI (or any endpoint speaking the same protocol).
    OpenAi,
}

impl ProviderKind {
    /// Stable provider identifier, as used in settings and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Dashscope => "dashscope",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Base URL used when the settings carry no override.
    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Dashscope => "https://dashscope.aliyuncs.com/compatible-mode/v1",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// Model used when the settings carry no override.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Dashscope => "qwen-plus",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "dashscope" => Some(ProviderKind::Dashscope),
            "openai" => Some(ProviderKind::OpenAi),
            _ => None,
        }
    }
}

/// Read-only snapshot of the externally supplied planner settings.
///
/// The UI (or whatever hosts the planner) owns the live settings store; the
/// planner only ever sees a snapshot like this one, taken at call time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Which provider to talk to.
    pub provider: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashscope_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashscope_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_base: Option<String>,
    /// Model override; empty/absent means the provider default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PlannerSettings {
    /// Build settings from the environment (see [`crate::config::keys`]).
    ///
    /// Unset or empty variables are treated as absent; an unrecognized
    /// provider name falls back to the default.
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        Self {
            provider: read(keys::TRIP_LLM_PROVIDER)
                .and_then(|v| ProviderKind::parse(&v))
                .unwrap_or_default(),
            dashscope_key: read(keys::DASHSCOPE_API_KEY),
            dashscope_base: read(keys::DASHSCOPE_BASE_URL),
            openai_key: read(keys::OPENAI_API_KEY),
            openai_base: read(keys::OPENAI_BASE_URL),
            model: read(keys::TRIP_LLM_MODEL),
        }
    }

    /// Parse settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        serde_yaml::from_str(yaml).map_err(SettingsError::Parse)
    }

    /// Load settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| SettingsError::Io {
            path: path.as_ref().to_string_lossy().into_owned(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Resolve the concrete endpoint, credential and model for the selected
    /// provider.
    ///
    /// Fails fast with [`PlannerError::MissingCredential`] when the selected
    /// provider has no API key; this happens before any network activity.
    pub fn resolve(&self) -> PlannerResult<ResolvedProvider> {
        let (key, base) = match self.provider {
            ProviderKind::Dashscope => (&self.dashscope_key, &self.dashscope_base),
            ProviderKind::OpenAi => (&self.openai_key, &self.openai_base),
        };

        let api_key = key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(PlannerError::MissingCredential {
                provider: self.provider.as_str(),
            })?
            .to_owned();

        let base = base
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| self.provider.default_base_url());

        let model = self
            .model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.provider.default_model())
            .to_owned();

        Ok(ResolvedProvider {
            kind: self.provider,
            endpoint: format!("{}/chat/completions", base.trim_end_matches('/')),
            api_key,
            model,
        })
    }
}

/// Concrete request target resolved from [`PlannerSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub kind: ProviderKind,
    /// Full chat-completions URL.
    pub endpoint: String,
    /// Bearer token for the Authorization header.
    pub api_key: String,
    pub model: String,
}

/// Settings-file loading failures. Distinct from [`PlannerError`]: a broken
/// settings file is a host-configuration problem, not a call failure.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),
}
