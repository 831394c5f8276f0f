use serde_json::Value;

use super::ParseError;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Parses the analyze flow's output: any JSON value, possibly wrapped as
/// ```` ```json\n ... ``` ````.
///
/// Only a fence at the very start and a closing fence at the very end are
/// removed; fences elsewhere are left for the JSON parser to reject.
pub fn parse_fenced_json(raw: &str) -> Result<Value, ParseError> {
    let unfenced = strip_fence(raw);
    let value = serde_json::from_str(unfenced.trim())?;
    Ok(value)
}

fn strip_fence(raw: &str) -> &str {
    let mut text = raw;
    if let Some(rest) = text.strip_prefix(FENCE_OPEN) {
        text = rest.strip_prefix('\n').unwrap_or(rest);
    }
    text.strip_suffix(FENCE_CLOSE).unwrap_or(text)
}
