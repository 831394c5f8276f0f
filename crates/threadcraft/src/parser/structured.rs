use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::artifacts::{DraftContent, IdeationResult};

use super::ParseError;

/// Parses the ideation flow's output. At least one idea, titles unique.
pub fn parse_ideation(raw: &str) -> Result<IdeationResult, ParseError> {
    let result: IdeationResult = parse_object(raw, &["analysis", "thread_ideas"])?;
    if result.thread_ideas.is_empty() {
        return Err(ParseError::NoThreadIdeas);
    }

    let mut seen = HashSet::new();
    for title in result.titles() {
        if !seen.insert(title) {
            return Err(ParseError::DuplicateTitle(title.to_string()));
        }
    }

    Ok(result)
}

/// Parses a generate or edit output. All three parts must carry text.
pub fn parse_draft(raw: &str) -> Result<DraftContent, ParseError> {
    let draft: DraftContent = parse_object(raw, &["hook", "story", "cta"])?;

    for (name, value) in [("hook", &draft.hook), ("story", &draft.story), ("cta", &draft.cta)] {
        if value.trim().is_empty() {
            return Err(ParseError::EmptyField(name));
        }
    }

    Ok(draft)
}

fn parse_object<T: DeserializeOwned>(
    raw: &str,
    required: &[&'static str],
) -> Result<T, ParseError> {
    let value: Value = serde_json::from_str(raw)?;

    for field in required {
        match value.get(*field) {
            Some(v) if !v.is_null() => {}
            _ => return Err(ParseError::MissingField(*field)),
        }
    }

    Ok(serde_json::from_value(value)?)
}
