//! PriceSeries: validated, chronologically ordered bar history for one instrument.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::{PriceBar, Symbol};

/// Reasons a bar sequence cannot become a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("{symbol}: empty instrument identifier")]
    EmptySymbol { symbol: Symbol },

    #[error("{symbol}: bar {index} dated {date} does not follow {previous}")]
    NotIncreasing {
        symbol: Symbol,
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("{symbol}: bar {index} dated {date} has a non-positive or non-finite price")]
    NonPositivePrice {
        symbol: Symbol,
        index: usize,
        date: NaiveDate,
    },
}

/// Bar history for a single instrument, strictly increasing by date.
///
/// Fields are private: the only way to obtain a series is through
/// [`PriceSeries::new`], which enforces ordering and positive prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<Symbol>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(SeriesError::EmptySymbol { symbol });
        }

        for (index, bar) in bars.iter().enumerate() {
            if !bar.has_positive_prices() {
                return Err(SeriesError::NonPositivePrice {
                    symbol,
                    index,
                    date: bar.date,
                });
            }
            if index > 0 {
                let previous = bars[index - 1].date;
                if bar.date <= previous {
                    return Err(SeriesError::NotIncreasing {
                        symbol,
                        index,
                        date: bar.date,
                        previous,
                    });
                }
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}
