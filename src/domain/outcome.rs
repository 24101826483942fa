//! Record build outcome types.

use super::record::Record;

/// Outcome of building one record.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// Every fetch step succeeded and the record is complete
    Success(Record),
    /// Some step failed; the unit is skipped for this run
    Failure { name: String, reason: String },
}

impl BuildOutcome {
    pub fn failure(name: impl Into<String>, reason: impl ToString) -> Self {
        BuildOutcome::Failure {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
