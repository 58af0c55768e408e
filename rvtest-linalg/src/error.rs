use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinalgError {
    #[error("Row {row} has {got} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Expected {expected} column labels, got {got}")]
    LabelCount { expected: usize, got: usize },
}
