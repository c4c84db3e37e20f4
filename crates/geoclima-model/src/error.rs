use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unsupported token '{token}' in date pattern '{pattern}'")]
    UnsupportedDateToken { pattern: String, token: String },
    #[error("date pattern '{pattern}' must contain a year, a month and a day")]
    IncompleteDatePattern { pattern: String },
    #[error("unterminated '[' escape in date pattern '{pattern}'")]
    UnterminatedEscape { pattern: String },
    #[error("'{value}' does not match date pattern '{pattern}'")]
    DateParse { value: String, pattern: String },
    #[error("invalid period key: '{0}'")]
    InvalidPeriodKey(String),
    #[error("unknown widget id: '{0}'")]
    UnknownWidget(String),
    #[error("unknown range manager: '{0}'")]
    UnknownRangeManager(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
