//! Builders for configs and the text the generation flows return.

#![allow(dead_code)]

use serde_json::json;

use threadcraft::config::schema::Config;

/// Builder for config JSON, so tests go through the real loader.
pub struct ConfigBuilder {
    api_url: String,
    endpoints: serde_json::Map<String, serde_json::Value>,
    slots: serde_json::Value,
    max_file_bytes: Option<u64>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            api_url: "http://localhost:7860/api/v1/run".to_string(),
            endpoints: serde_json::Map::new(),
            slots: json!({}),
            max_file_bytes: None,
        }
    }

    pub fn api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    pub fn endpoint(mut self, name: &str, path: &str) -> Self {
        self.endpoints.insert(name.to_string(), json!(path));
        self
    }

    /// Overrides one slot id, e.g. `slot("generate", "thread", "TextInput-x")`.
    pub fn slot(mut self, endpoint: &str, slot: &str, id: &str) -> Self {
        self.slots[endpoint][slot] = json!(id);
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = Some(bytes);
        self
    }

    pub fn to_json(&self) -> String {
        let mut config = json!({
            "version": "1.0",
            "api_url": self.api_url,
            "endpoints": self.endpoints,
            "slots": self.slots,
        });
        if let Some(bytes) = self.max_file_bytes {
            config["ingest"] = json!({ "max_file_bytes": bytes });
        }
        serde_json::to_string_pretty(&config).unwrap()
    }

    pub fn build(&self) -> Config {
        threadcraft::config::load_config_from_str(&self.to_json()).unwrap()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze output as the flow writes it: JSON in a code fence.
pub fn analysis_text(value: &serde_json::Value) -> String {
    format!("```json\n{}\n```", value)
}

/// Research output with the given trend line and insight bullets.
pub fn research_text(trend_line: &str, insights: &[&str]) -> String {
    let bullets: Vec<String> = insights.iter().map(|i| format!("* {}", i)).collect();
    format!(
        "### Trending threads\n{}\n### Marking Insights\n{}\n# Market Opportunities\n...",
        trend_line,
        bullets.join("\n")
    )
}

pub fn ideation_text(analysis: &str, titles: &[&str]) -> String {
    let ideas: Vec<serde_json::Value> = titles
        .iter()
        .map(|t| json!({ "suggested_title": t, "description": format!("About {}", t) }))
        .collect();
    json!({ "analysis": analysis, "thread_ideas": ideas }).to_string()
}

pub fn draft_text(hook: &str, story: &str, cta: &str) -> String {
    json!({ "hook": hook, "story": story, "cta": cta }).to_string()
}
