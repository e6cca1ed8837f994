//! Lifecycle status derived from a bill's latest action text.

use std::fmt;

/// Derived lifecycle stage of a bill.
///
/// The display string is what gets persisted and filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillStatus {
    Enacted,
    PassedBothChambers,
    PassedHouse,
    PassedSenate,
    Vetoed,
    InCommittee,
    Introduced,
    Pending,
}

impl BillStatus {
    /// Classify a free-text latest-action description.
    ///
    /// Case-insensitive ordered substring match, first match wins. The
    /// both-chambers check runs before the single-chamber checks so a text
    /// mentioning both always classifies as `PassedBothChambers`.
    pub fn classify(latest_action_text: &str) -> Self {
        let text = latest_action_text.to_lowercase();

        if text.contains("became public law") || text.contains("signed by president") {
            return Self::Enacted;
        }
        if text.contains("passed house") && text.contains("passed senate") {
            return Self::PassedBothChambers;
        }
        if text.contains("passed house") {
            return Self::PassedHouse;
        }
        if text.contains("passed senate") {
            return Self::PassedSenate;
        }
        if text.contains("vetoed") {
            return Self::Vetoed;
        }
        if text.contains("referred to") {
            return Self::InCommittee;
        }
        if text.contains("introduced") {
            return Self::Introduced;
        }

        Self::Pending
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enacted => "Enacted",
            Self::PassedBothChambers => "Passed Both Chambers",
            Self::PassedHouse => "Passed House",
            Self::PassedSenate => "Passed Senate",
            Self::Vetoed => "Vetoed",
            Self::InCommittee => "In Committee",
            Self::Introduced => "Introduced",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
