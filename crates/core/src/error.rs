use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum NetChartError {
    #[error("config error: {0}")]
    Config(String),

    /// The OS byte-counter source could not be read.
    #[error("counter source unavailable: {0}")]
    Counter(String),

    /// An append would have broken the strictly increasing time axis.
    #[error("non-monotonic sample: t={next} does not follow t={previous}")]
    NonMonotonic { previous: f64, next: f64 },

    #[error("render error: {0}")]
    Render(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("system error: {0}")]
    System(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = NetChartError> = std::result::Result<T, E>;
