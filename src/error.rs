//! Error taxonomy for the session layer.
//!
//! Config-class errors (`NoTable`, `NoColumns`, `EmptyRecord`) are caller
//! misuse detected before any engine call. `Open` means the store could
//! not be opened; `Engine` carries a statement the engine rejected.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no target table set")]
    NoTable,
    #[error("no columns defined for table '{0}'")]
    NoColumns(String),
    #[error("record has no columns or values")]
    EmptyRecord,
    #[error("store could not be opened: {0}")]
    Open(#[source] rusqlite::Error),
    #[error("engine rejected statement: {0}")]
    Engine(#[from] rusqlite::Error),
}

impl Error {
    /// True for caller-misuse errors that are raised before the engine is
    /// ever touched.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::NoTable | Error::NoColumns(_) | Error::EmptyRecord
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
