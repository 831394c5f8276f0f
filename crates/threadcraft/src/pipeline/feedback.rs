//! Structured feedback collected at the Draft stage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Improvement {
    Hook,
    Examples,
    Flow,
    Cta,
}

impl Improvement {
    /// Serialization order of the flags.
    pub const ALL: [Improvement; 4] = [
        Improvement::Hook,
        Improvement::Examples,
        Improvement::Flow,
        Improvement::Cta,
    ];

    fn index(self) -> usize {
        match self {
            Improvement::Hook => 0,
            Improvement::Examples => 1,
            Improvement::Flow => 2,
            Improvement::Cta => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneAccuracy {
    TooFormal,
    TooCasual,
    TooAggressive,
    Perfect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentQuality {
    TooBasic,
    TooComplex,
    TooLong,
    TooShort,
    Perfect,
}

/// Feedback as sent to the edit flow. Only obtainable from a
/// [`FeedbackForm`] with at least one improvement flag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRecord {
    #[serde(rename = "What_needs_improvement")]
    improvements: Vec<Improvement>,
    #[serde(rename = "Tone_Accuracy")]
    tone: Option<ToneAccuracy>,
    #[serde(rename = "Content_Quality")]
    quality: Option<ContentQuality>,
    #[serde(rename = "Additional_Comments")]
    comments: Option<String>,
}

impl FeedbackRecord {
    pub fn improvements(&self) -> &[Improvement] {
        &self.improvements
    }

    pub fn tone(&self) -> Option<ToneAccuracy> {
        self.tone
    }

    pub fn quality(&self) -> Option<ContentQuality> {
        self.quality
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }
}

/// The editable feedback form. Reset after every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    flags: [bool; 4],
    tone: Option<ToneAccuracy>,
    quality: Option<ContentQuality>,
    comments: String,
}

impl FeedbackForm {
    /// Flips a flag and returns its new value.
    pub fn toggle(&mut self, improvement: Improvement) -> bool {
        let flag = &mut self.flags[improvement.index()];
        *flag = !*flag;
        *flag
    }

    pub fn is_flagged(&self, improvement: Improvement) -> bool {
        self.flags[improvement.index()]
    }

    pub fn has_flags(&self) -> bool {
        self.flags.iter().any(|f| *f)
    }

    pub fn set_tone(&mut self, tone: Option<ToneAccuracy>) {
        self.tone = tone;
    }

    pub fn set_quality(&mut self, quality: Option<ContentQuality>) {
        self.quality = quality;
    }

    pub fn set_comments(&mut self, comments: &str) {
        self.comments = comments.to_string();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `None` unless at least one improvement flag is set.
    pub fn to_record(&self) -> Option<FeedbackRecord> {
        if !self.has_flags() {
            return None;
        }

        let improvements = Improvement::ALL
            .into_iter()
            .filter(|i| self.is_flagged(*i))
            .collect();
        let comments = if self.comments.is_empty() {
            None
        } else {
            Some(self.comments.clone())
        };

        Some(FeedbackRecord {
            improvements,
            tone: self.tone,
            quality: self.quality,
            comments,
        })
    }
}
