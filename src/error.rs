use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown effect: {0}")]
    UnknownEffect(String),
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("non-finite value for {name}: {value}")]
    NonFiniteValue { name: String, value: f64 },
    #[error("{name}={value} outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("palette index {0} outside 1..=4")]
    InvalidPaletteIndex(usize),
    #[error("{backend} backend unavailable: {reason}")]
    BackendInit {
        backend: &'static str,
        reason: String,
    },
    #[error("frame submission failed: {0}")]
    BackendSubmit(String),
    #[error("engine disposed")]
    Disposed,
}

pub type EngineResult<T> = Result<T, EngineError>;
