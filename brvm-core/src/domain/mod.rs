//! Domain types for the BRVM scanner.

pub mod bar;
pub mod series;
pub mod signal;

pub use bar::PriceBar;
pub use series::{PriceSeries, SeriesError};
pub use signal::{ParseSignalError, Signal};

/// Instrument identifier (ticker), e.g. `SNTS`.
pub type Symbol = String;
