use rekey_types::{ChangeRecord, LookupTable};
use serde::Serialize;

/// What happened to one configured file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    /// Rewritten (or, in a dry run, rendered) with these changes.
    Processed {
        file: String,
        changes: Vec<ChangeRecord>,
    },
    /// Not present on disk.
    Skipped { file: String },
    /// Parsing, serialization, or I/O failed.
    Failed { file: String, error: String },
}

impl FileOutcome {
    pub fn file(&self) -> &str {
        match self {
            Self::Processed { file, .. } | Self::Skipped { file } | Self::Failed { file, .. } => file,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcomes of a finished run plus the accumulated lookup table.
///
/// The lookup table only holds entries from files that were processed
/// successfully.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<FileOutcome>,
    pub lookup: LookupTable,
}

impl RunReport {
    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Processed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Total change records across processed files.
    pub fn total_changes(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Processed { changes, .. } => changes.len(),
                _ => 0,
            })
            .sum()
    }
}
