use thiserror::Error;

/// Where in an input file a problem was found. Row numbers are 1-based data rows, the header
/// row is not counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: &'static str,
    pub row: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} row {}", self.file, self.row)
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Parse error in {position}: {message}")]
    Parse { position: Position, message: String },

    #[error("Parse error in {file}: missing column '{column}'")]
    MissingColumn {
        file: &'static str,
        column: &'static str,
    },

    #[error("Parse error: invalid conversion date '{0}', expected MM/DD/YYYY")]
    ConversionDate(String),

    #[error("Memo template error: {0}")]
    Format(String),

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Mapping error: {0}")]
    Config(String),

    #[error("{file} has more than {limit} rows")]
    TooManyRows { file: &'static str, limit: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub fn parse(file: &'static str, row: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position: Position { file, row },
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
