use serde::{Deserialize, Serialize};

/// Ceiling applied to uploaded documents before extraction (2 MB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// Base URL of the generation service; endpoint paths are appended verbatim.
    pub api_url: String,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub slots: SlotsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub ingest: IngestConfig,
}

fn default_request_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

impl Config {
    /// Minimal config pointing at `api_url` with every other setting defaulted.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            version: "1.0".to_string(),
            api_url: api_url.into(),
            endpoints: EndpointsConfig::default(),
            slots: SlotsConfig::default(),
            auth: AuthConfig::default(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            ingest: IngestConfig::default(),
        }
    }
}

/// Paths of the five generation flows, relative to `api_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_analyze")]
    pub analyze: String,
    #[serde(default = "default_research")]
    pub research: String,
    #[serde(default = "default_ideation")]
    pub ideation: String,
    #[serde(default = "default_generate")]
    pub generate: String,
    #[serde(default = "default_edit")]
    pub edit: String,
}

fn default_analyze() -> String {
    "/analyze".to_string()
}

fn default_research() -> String {
    "/research".to_string()
}

fn default_ideation() -> String {
    "/ideation".to_string()
}

fn default_generate() -> String {
    "/generate".to_string()
}

fn default_edit() -> String {
    "/edit".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            analyze: default_analyze(),
            research: default_research(),
            ideation: default_ideation(),
            generate: default_generate(),
            edit: default_edit(),
        }
    }
}

/// Component identifiers of the flow inputs that receive substituted values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotsConfig {
    #[serde(default)]
    pub ideation: IdeationSlots,
    #[serde(default)]
    pub generate: GenerateSlots,
    #[serde(default)]
    pub edit: EditSlots,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeationSlots {
    #[serde(default = "default_ideation_analysis")]
    pub analysis: String,
    #[serde(default = "default_ideation_trends")]
    pub trends: String,
}

fn default_ideation_analysis() -> String {
    "TextInput-HrRJ6".to_string()
}

fn default_ideation_trends() -> String {
    "TextInput-nCK7J".to_string()
}

impl Default for IdeationSlots {
    fn default() -> Self {
        Self {
            analysis: default_ideation_analysis(),
            trends: default_ideation_trends(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlots {
    #[serde(default = "default_generate_analysis")]
    pub analysis: String,
    #[serde(default = "default_generate_thread")]
    pub thread: String,
}

fn default_generate_analysis() -> String {
    "TextInput-3ONqe".to_string()
}

fn default_generate_thread() -> String {
    "TextInput-KHboB".to_string()
}

impl Default for GenerateSlots {
    fn default() -> Self {
        Self {
            analysis: default_generate_analysis(),
            thread: default_generate_thread(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditSlots {
    #[serde(default = "default_edit_hook")]
    pub hook: String,
    #[serde(default = "default_edit_cta")]
    pub cta: String,
    #[serde(default = "default_edit_story")]
    pub story: String,
    #[serde(default = "default_edit_feedback")]
    pub feedback: String,
}

fn default_edit_hook() -> String {
    "TextInput-qp57q".to_string()
}

fn default_edit_cta() -> String {
    "TextInput-ZGgvn".to_string()
}

fn default_edit_story() -> String {
    "TextInput-8Y188".to_string()
}

fn default_edit_feedback() -> String {
    "TextInput-6wyUR".to_string()
}

impl Default for EditSlots {
    fn default() -> Self {
        Self {
            hook: default_edit_hook(),
            cta: default_edit_cta(),
            story: default_edit_story(),
            feedback: default_edit_feedback(),
        }
    }
}

/// Where the bearer token for the generation service comes from.
/// All fields empty means requests are sent unauthenticated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_file: Option<String>,
    #[serde(default)]
    pub token_env_var: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"version": "1.0", "api_url": "http://localhost:7860"}"#)
                .unwrap();

        assert_eq!(config.endpoints.analyze, "/analyze");
        assert_eq!(config.endpoints.edit, "/edit");
        assert_eq!(config.slots.ideation.analysis, "TextInput-HrRJ6");
        assert_eq!(config.slots.edit.feedback, "TextInput-6wyUR");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.ingest.max_file_bytes, 2 * 1024 * 1024);
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_partial_slot_override_keeps_other_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "version": "1.0",
                "api_url": "http://localhost:7860",
                "slots": { "generate": { "thread": "TextInput-custom" } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.slots.generate.thread, "TextInput-custom");
        assert_eq!(config.slots.generate.analysis, "TextInput-3ONqe");
        assert_eq!(config.slots.ideation.trends, "TextInput-nCK7J");
    }

    #[test]
    fn test_with_api_url_matches_serde_defaults() {
        let built = Config::with_api_url("http://example.test");
        let parsed: Config =
            serde_json::from_str(r#"{"version": "1.0", "api_url": "http://example.test"}"#)
                .unwrap();

        assert_eq!(built.api_url, parsed.api_url);
        assert_eq!(built.endpoints.research, parsed.endpoints.research);
        assert_eq!(built.request_timeout_secs, parsed.request_timeout_secs);
        assert_eq!(built.ingest.max_file_bytes, parsed.ingest.max_file_bytes);
    }
}
