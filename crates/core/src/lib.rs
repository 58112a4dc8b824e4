pub mod error;
pub mod sample;
pub mod series;

pub use error::{NetChartError, Result};
pub use sample::{CounterSnapshot, RatePoint, MIB};
pub use series::{SeriesReader, SeriesSnapshot, SeriesWriter};
