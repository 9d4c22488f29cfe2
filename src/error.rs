/// Error types for the geoipmap library
use std::fmt;

/// Result type alias for geoipmap operations
pub type Result<T> = std::result::Result<T, GeoIpMapError>;

/// Main error type for geoipmap operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoIpMapError {
    /// I/O errors (missing or unreadable input files)
    Io(String),

    /// Malformed network database row
    Parse {
        /// 1-based row number in the source
        line: usize,
        /// What was wrong with the row
        message: String,
    },

    /// Invalid network prefix text
    InvalidNetwork(String),

    /// Rejected configuration (geometry, strategy selection)
    Config(String),

    /// A concurrent worker failed before returning its result
    Worker(String),
}

impl GeoIpMapError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        GeoIpMapError::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        GeoIpMapError::Config(message.into())
    }
}

impl fmt::Display for GeoIpMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoIpMapError::Io(msg) => write!(f, "I/O error: {}", msg),
            GeoIpMapError::Parse { line, message } => {
                write!(f, "Parse error on line {}: {}", line, message)
            }
            GeoIpMapError::InvalidNetwork(msg) => write!(f, "Invalid network: {}", msg),
            GeoIpMapError::Config(msg) => write!(f, "Configuration error: {}", msg),
            GeoIpMapError::Worker(msg) => write!(f, "Worker error: {}", msg),
        }
    }
}

impl std::error::Error for GeoIpMapError {}

impl From<std::io::Error> for GeoIpMapError {
    fn from(err: std::io::Error) -> Self {
        GeoIpMapError::Io(err.to_string())
    }
}

impl From<csv::Error> for GeoIpMapError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or_default();
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => GeoIpMapError::Io(io_err.to_string()),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => GeoIpMapError::parse(
                line,
                format!("expected {} columns, found {}", expected_len, len),
            ),
            other => GeoIpMapError::parse(line, format!("{:?}", other)),
        }
    }
}
