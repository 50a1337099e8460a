//! Classification result types.

use serde::Serialize;

/// How sure the classifier is about a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bot/human decision for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub is_bot: bool,
    pub confidence: Confidence,
    pub reason: Option<String>,
}

impl Verdict {
    pub fn human(confidence: Confidence, reason: Option<String>) -> Self {
        Self {
            is_bot: false,
            confidence,
            reason,
        }
    }

    pub fn bot(confidence: Confidence, reason: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            confidence,
            reason: Some(reason.into()),
        }
    }

    /// Boolean decision used for dispatch.
    ///
    /// Low-confidence bot verdicts count as human.
    pub fn is_actionable_bot(&self) -> bool {
        self.is_bot && self.confidence >= Confidence::Medium
    }

    pub fn label(&self) -> &'static str {
        if self.is_bot {
            "bot"
        } else {
            "human"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn low_confidence_bot_is_not_actionable() {
        assert!(!Verdict::bot(Confidence::Low, "bot").is_actionable_bot());
        assert!(Verdict::bot(Confidence::Medium, "curl").is_actionable_bot());
        assert!(Verdict::bot(Confidence::High, "Bytespider").is_actionable_bot());
        assert!(!Verdict::human(Confidence::High, None).is_actionable_bot());
    }
}
