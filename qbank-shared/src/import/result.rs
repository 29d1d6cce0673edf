/// Import outcome accumulation

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one import pass
///
/// Counters only ever grow while rows are processed. Errors are kept in row
/// order and formatted as `Row <n>: <reason>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Accounts created
    pub created: u32,

    /// Existing accounts updated
    pub updated: u32,

    /// One message per failed row
    pub errors: Vec<String>,
}

impl ImportResult {
    pub fn record_created(&mut self) {
        self.created += 1;
    }

    pub fn record_updated(&mut self) {
        self.updated += 1;
    }

    /// Records a failed row; `row` is the 1-based position in the upload
    pub fn record_error(&mut self, row: usize, reason: impl fmt::Display) {
        self.errors.push(format!("Row {row}: {reason}"));
    }

    /// Rows that produced a visible outcome
    ///
    /// Can be lower than the number of input rows when inserts were silently
    /// skipped because of a concurrent insert of the same email.
    pub fn accounted_rows(&self) -> usize {
        self.created as usize + self.updated as usize + self.errors.len()
    }
}
