use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppraisalError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Defect limit reached for '{part_id}' (max {capacity})")]
    CapacityExceeded { part_id: String, capacity: usize },

    #[error("Malformed Scan Data: {0}")]
    MalformedScanData(String),

    #[error("Unknown Defect Code: '{0}'")]
    UnknownDefectCode(String),

    #[error("Unknown Severity Level: '{0}'")]
    UnknownSeverityLevel(String),
}

pub type AppraisalResult<T> = Result<T, AppraisalError>;
