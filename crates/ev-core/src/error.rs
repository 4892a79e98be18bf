use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Empty geometry: {what}")]
    EmptyGeometry { what: &'static str },

    #[error("Unsupported datetime format: {input}")]
    InvalidDateTime { input: String },

    #[error("Malformed EWKB point: {what}")]
    MalformedEwkb { what: String },

    #[error("Time out of bounds: {what} ({instant})")]
    TimeOutOfBounds { what: &'static str, instant: String },
}
