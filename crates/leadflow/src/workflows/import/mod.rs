//! Bulk lead import from CRM CSV exports.
//!
//! Parses the firm's lead-export format into [`LeadSubmission`] values so a
//! backlog can be replayed through the intake pipeline. Optional columns
//! degrade to `None`; the scorer's defaults absorb the rest.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::intake::domain::LeadSubmission;

pub struct CsvLeadImporter;

impl CsvLeadImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<LeadSubmission>, LeadImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<LeadSubmission>, LeadImportError> {
        Ok(parser::parse_rows(reader)?)
    }
}

#[derive(Debug)]
pub enum LeadImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for LeadImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadImportError::Io(err) => write!(f, "failed to read lead export: {}", err),
            LeadImportError::Csv(err) => write!(f, "invalid lead CSV data: {}", err),
        }
    }
}

impl std::error::Error for LeadImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadImportError::Io(err) => Some(err),
            LeadImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LeadImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LeadImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}
