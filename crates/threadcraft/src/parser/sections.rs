use tracing::{debug, warn};

use crate::artifacts::{TrendInsights, NO_INSIGHTS, NO_TRENDS};

/// How far a section reaches past its header line.
enum Extent {
    /// Only the line right after the header.
    NextLine,
    /// Every line up to the first one containing any of these markers,
    /// or the end of the text.
    UntilAny(&'static [&'static str]),
}

struct Section {
    name: &'static str,
    header: &'static str,
    extent: Extent,
}

const TRENDING: Section = Section {
    name: "Trending threads",
    header: "### Trending threads",
    extent: Extent::NextLine,
};

// "Marking" is what the research flow actually emits.
const MARKET_INSIGHTS: Section = Section {
    name: "Market Insights",
    header: "### Marking Insights",
    extent: Extent::UntilAny(&["# Market Opportunities", "# Market Challenges"]),
};

impl Section {
    /// Lines belonging to this section, or `None` if its header is absent.
    fn locate<'a>(&self, lines: &[&'a str]) -> Option<Vec<&'a str>> {
        let start = lines.iter().position(|line| line.contains(self.header))?;
        let body = &lines[start + 1..];

        let body = match self.extent {
            Extent::NextLine => &body[..body.len().min(1)],
            Extent::UntilAny(markers) => {
                let end = body
                    .iter()
                    .position(|line| markers.iter().any(|m| line.contains(m)))
                    .unwrap_or(body.len());
                &body[..end]
            }
        };
        Some(body.to_vec())
    }
}

/// Parses the research flow's output. Never fails: each missing section
/// degrades to its sentinel entry.
pub fn parse_trend_insights(raw: &str) -> TrendInsights {
    let lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect();

    let raw_trend_line = match TRENDING.locate(&lines) {
        Some(body) if !body.is_empty() => body[0].to_string(),
        Some(_) => {
            warn!("{} header has no line after it", TRENDING.name);
            String::new()
        }
        None => {
            warn!("{} section not found", TRENDING.name);
            String::new()
        }
    };
    let trends = normalize_tags(&raw_trend_line);

    let market_insights = match MARKET_INSIGHTS.locate(&lines) {
        Some(body) => clean_bullets(&body),
        None => {
            warn!("{} section not found", MARKET_INSIGHTS.name);
            Vec::new()
        }
    };

    debug!(
        trends = trends.len(),
        insights = market_insights.len(),
        "Parsed research output"
    );

    TrendInsights {
        trends: or_sentinel(trends, NO_TRENDS),
        market_insights: or_sentinel(market_insights, NO_INSIGHTS),
        raw_trend_line,
    }
}

/// `"ai, productivity , web3"` becomes `["#ai", "#productivity", "#web3"]`.
/// Empty tokens are dropped.
pub fn normalize_tags(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{}", tag))
        .collect()
}

fn clean_bullets(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.strip_prefix("* ").unwrap_or(line).trim().to_string())
        .collect()
}

fn or_sentinel(values: Vec<String>, sentinel: &str) -> Vec<String> {
    if values.is_empty() {
        vec![sentinel.to_string()]
    } else {
        values
    }
}
