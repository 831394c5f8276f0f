//! Slot substitution: which flow input receives which piece of state.

use serde_json::{json, Map, Value};

use crate::artifacts::DraftContent;
use crate::config::schema::SlotsConfig;
use crate::pipeline::feedback::FeedbackRecord;
use crate::transport::Endpoint;

use super::InvokeError;

/// A piece of accumulated state that can fill a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSource {
    /// The analyze output, wrapped as `{"parsedanalyzed": ...}` and serialized.
    Analysis,
    /// The research trend line, verbatim.
    TrendLine,
    SelectedThread,
    DraftHook,
    DraftStory,
    DraftCta,
    /// The submitted feedback record, serialized.
    Feedback,
}

impl SlotSource {
    pub fn name(&self) -> &'static str {
        match self {
            SlotSource::Analysis => "analysis",
            SlotSource::TrendLine => "trend line",
            SlotSource::SelectedThread => "selected thread",
            SlotSource::DraftHook => "draft hook",
            SlotSource::DraftStory => "draft story",
            SlotSource::DraftCta => "draft cta",
            SlotSource::Feedback => "feedback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    pub slot_id: String,
    pub source: SlotSource,
}

impl SlotBinding {
    fn new(slot_id: &str, source: SlotSource) -> Self {
        Self {
            slot_id: slot_id.to_string(),
            source,
        }
    }
}

/// `{endpoint -> [(slot id, source)]}` for the flows that take tweaks.
#[derive(Debug, Clone)]
pub struct SlotTable {
    ideation: Vec<SlotBinding>,
    generate: Vec<SlotBinding>,
    edit: Vec<SlotBinding>,
}

impl SlotTable {
    pub fn from_config(slots: &SlotsConfig) -> Self {
        Self {
            ideation: vec![
                SlotBinding::new(&slots.ideation.analysis, SlotSource::Analysis),
                SlotBinding::new(&slots.ideation.trends, SlotSource::TrendLine),
            ],
            generate: vec![
                SlotBinding::new(&slots.generate.analysis, SlotSource::Analysis),
                SlotBinding::new(&slots.generate.thread, SlotSource::SelectedThread),
            ],
            edit: vec![
                SlotBinding::new(&slots.edit.hook, SlotSource::DraftHook),
                SlotBinding::new(&slots.edit.cta, SlotSource::DraftCta),
                SlotBinding::new(&slots.edit.story, SlotSource::DraftStory),
                SlotBinding::new(&slots.edit.feedback, SlotSource::Feedback),
            ],
        }
    }

    /// Bindings for `endpoint`; empty for flows that take a plain input.
    pub fn bindings(&self, endpoint: Endpoint) -> &[SlotBinding] {
        match endpoint {
            Endpoint::Ideation => &self.ideation,
            Endpoint::Generate => &self.generate,
            Endpoint::Edit => &self.edit,
            Endpoint::Analyze | Endpoint::Research => &[],
        }
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::from_config(&SlotsConfig::default())
    }
}

/// Borrowed view of the state a tweaks payload may draw from.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlotValues<'a> {
    pub analysis: Option<&'a Value>,
    pub trend_line: Option<&'a str>,
    pub selected_thread: Option<&'a str>,
    pub draft: Option<&'a DraftContent>,
    pub feedback: Option<&'a FeedbackRecord>,
}

impl SlotValues<'_> {
    fn resolve(&self, endpoint: Endpoint, source: SlotSource) -> Result<String, InvokeError> {
        let missing = || InvokeError::MissingInput {
            endpoint,
            input: source.name(),
        };

        let value = match source {
            SlotSource::Analysis => {
                let analysis = self.analysis.ok_or_else(missing)?;
                json!({ "parsedanalyzed": analysis }).to_string()
            }
            SlotSource::TrendLine => self.trend_line.ok_or_else(missing)?.to_string(),
            SlotSource::SelectedThread => self.selected_thread.ok_or_else(missing)?.to_string(),
            SlotSource::DraftHook => self.draft.ok_or_else(missing)?.hook.clone(),
            SlotSource::DraftStory => self.draft.ok_or_else(missing)?.story.clone(),
            SlotSource::DraftCta => self.draft.ok_or_else(missing)?.cta.clone(),
            SlotSource::Feedback => {
                let feedback = self.feedback.ok_or_else(missing)?;
                serde_json::to_string(feedback).map_err(InvokeError::Encode)?
            }
        };
        Ok(value)
    }
}

/// `{"input_value": text}` for analyze and research.
pub fn input_payload(text: &str) -> Value {
    json!({ "input_value": text })
}

/// `{"tweaks": {slot_id: {"input_value": value}}}` built from `table`.
pub fn tweaks_payload(
    table: &SlotTable,
    endpoint: Endpoint,
    values: &SlotValues<'_>,
) -> Result<Value, InvokeError> {
    let mut tweaks = Map::new();
    for binding in table.bindings(endpoint) {
        let value = values.resolve(endpoint, binding.source)?;
        tweaks.insert(binding.slot_id.clone(), json!({ "input_value": value }));
    }
    Ok(json!({ "tweaks": tweaks }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::feedback::{FeedbackForm, Improvement, ToneAccuracy};

    #[test]
    fn test_ideation_payload() {
        let analysis = json!({"topic": "growth"});
        let values = SlotValues {
            analysis: Some(&analysis),
            trend_line: Some("ai, growth, b2b"),
            ..Default::default()
        };

        let body = tweaks_payload(&SlotTable::default(), Endpoint::Ideation, &values).unwrap();

        let analysis_input = body["tweaks"]["TextInput-HrRJ6"]["input_value"]
            .as_str()
            .unwrap();
        let decoded: Value = serde_json::from_str(analysis_input).unwrap();
        assert_eq!(decoded, json!({"parsedanalyzed": {"topic": "growth"}}));
        assert_eq!(
            body["tweaks"]["TextInput-nCK7J"]["input_value"],
            "ai, growth, b2b"
        );
        assert_eq!(body["tweaks"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_generate_payload_uses_selected_thread() {
        let analysis = json!(["a"]);
        let values = SlotValues {
            analysis: Some(&analysis),
            selected_thread: Some("T2"),
            ..Default::default()
        };

        let body = tweaks_payload(&SlotTable::default(), Endpoint::Generate, &values).unwrap();

        assert_eq!(body["tweaks"]["TextInput-KHboB"]["input_value"], "T2");
        assert_eq!(
            body["tweaks"]["TextInput-3ONqe"]["input_value"],
            r#"{"parsedanalyzed":["a"]}"#
        );
    }

    #[test]
    fn test_edit_payload() {
        let draft = DraftContent {
            hook: "H".to_string(),
            story: "S".to_string(),
            cta: "C".to_string(),
        };
        let mut form = FeedbackForm::default();
        form.toggle(Improvement::Hook);
        form.set_tone(Some(ToneAccuracy::TooFormal));
        let feedback = form.to_record().unwrap();
        let values = SlotValues {
            draft: Some(&draft),
            feedback: Some(&feedback),
            ..Default::default()
        };

        let body = tweaks_payload(&SlotTable::default(), Endpoint::Edit, &values).unwrap();
        let tweaks = &body["tweaks"];

        assert_eq!(tweaks["TextInput-qp57q"]["input_value"], "H");
        assert_eq!(tweaks["TextInput-8Y188"]["input_value"], "S");
        assert_eq!(tweaks["TextInput-ZGgvn"]["input_value"], "C");
        let feedback_json: Value =
            serde_json::from_str(tweaks["TextInput-6wyUR"]["input_value"].as_str().unwrap())
                .unwrap();
        assert_eq!(feedback_json["What_needs_improvement"], json!(["hook"]));
        assert_eq!(feedback_json["Tone_Accuracy"], "too_formal");
    }

    #[test]
    fn test_missing_input_is_reported() {
        let values = SlotValues::default();
        match tweaks_payload(&SlotTable::default(), Endpoint::Generate, &values) {
            Err(InvokeError::MissingInput { input, .. }) => assert_eq!(input, "analysis"),
            other => panic!("Expected MissingInput, got {:?}", other),
        }
    }

    #[test]
    fn test_overridden_slot_ids() {
        let mut config = SlotsConfig::default();
        config.generate.thread = "TextInput-custom".to_string();
        let table = SlotTable::from_config(&config);

        let ids: Vec<_> = table
            .bindings(Endpoint::Generate)
            .iter()
            .map(|b| b.slot_id.as_str())
            .collect();
        assert_eq!(ids, vec!["TextInput-3ONqe", "TextInput-custom"]);
        assert!(table.bindings(Endpoint::Analyze).is_empty());
    }

    #[test]
    fn test_input_payload() {
        assert_eq!(input_payload("text"), json!({"input_value": "text"}));
    }
}
