use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Input file does not exist: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("Failed to read CSV file {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV file has no header row: {}", .0.display())]
    EmptyCsv(PathBuf),

    #[error("Failed to write workbook {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("No CSV files matching pattern {pattern} found in {}", .dir.display())]
    NoMatchingFiles { dir: PathBuf, pattern: String },

    #[error("No merged workbook was produced")]
    NoOutputsProduced,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
