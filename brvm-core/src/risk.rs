//! Risk manager: fixed-fractional position sizing with a percentage stop.
//!
//! # Formula
//! ```text
//! per_share_risk = close * stop_loss_fraction
//! stop_loss      = close - per_share_risk
//! budget         = capital * risk_fraction
//! quantity       = min(floor(budget / per_share_risk), floor(capital / close))
//! take_profit    = close * (1 + stop_loss_fraction * reward_risk_ratio)
//! ```
//!
//! # Example
//! - Capital: 10 000, risk 2% → budget 200
//! - Close 100, stop 5% → stop-loss 95, per-share risk 5
//! - Quantity: 200 / 5 = 40 shares (cost 4 000)

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Quotients this close to an integer are treated as that integer before the
/// affordability check steps them down.
const QUANTITY_SNAP: f64 = 1e-9;
/// 2^53: above this, consecutive quantities are no longer distinct as `f64`.
const MAX_EXACT_UNITS: f64 = 9_007_199_254_740_992.0;

/// Caller-supplied risk policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Capital available for the position, in the instrument's currency.
    pub capital: f64,
    /// Maximum fraction of capital lost if the stop is hit, in (0, 1].
    pub risk_fraction: f64,
    /// Stop distance below entry as a fraction of entry, in (0, 1).
    pub stop_loss_fraction: f64,
    /// Take-profit distance as a multiple of the stop distance.
    pub reward_risk_ratio: f64,
    /// Trailing-stop distance below entry, in (0, 1).
    pub trailing_stop_fraction: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            capital: 1_000_000.0,
            risk_fraction: 0.02,
            stop_loss_fraction: 0.05,
            reward_risk_ratio: 2.0,
            trailing_stop_fraction: 0.03,
        }
    }
}

impl RiskPolicy {
    pub fn with_capital(capital: f64) -> Self {
        Self {
            capital,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::InvalidRiskPolicy(reason));

        if !(self.capital.is_finite() && self.capital > 0.0) {
            return invalid(format!("capital must be positive, got {}", self.capital));
        }
        if !(self.risk_fraction > 0.0 && self.risk_fraction <= 1.0) {
            return invalid(format!(
                "risk_fraction must be in (0, 1], got {}",
                self.risk_fraction
            ));
        }
        if !(self.stop_loss_fraction > 0.0 && self.stop_loss_fraction < 1.0) {
            return invalid(format!(
                "stop_loss_fraction must be in (0, 1), got {}",
                self.stop_loss_fraction
            ));
        }
        if !(self.reward_risk_ratio.is_finite() && self.reward_risk_ratio > 0.0) {
            return invalid(format!(
                "reward_risk_ratio must be positive, got {}",
                self.reward_risk_ratio
            ));
        }
        if !(self.trailing_stop_fraction > 0.0 && self.trailing_stop_fraction < 1.0) {
            return invalid(format!(
                "trailing_stop_fraction must be in (0, 1), got {}",
                self.trailing_stop_fraction
            ));
        }
        Ok(())
    }

    /// Maximum loss allowed on one trade.
    pub fn risk_budget(&self) -> f64 {
        self.capital * self.risk_fraction
    }
}

/// Concrete position recommendation for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskRecommendation {
    /// Shares to buy; zero means "do not trade".
    pub quantity: u64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub trailing_stop: f64,
    /// Loss if the stop is hit: quantity × (entry − stop).
    pub capital_at_risk: f64,
    /// Cost of the position: quantity × entry.
    pub position_value: f64,
    /// Gain if the take-profit is hit.
    pub potential_gain: f64,
    /// Reward per unit of risk; zero when there is no risk to measure.
    pub reward_risk: f64,
}

impl RiskRecommendation {
    pub fn is_tradeable(&self) -> bool {
        self.quantity > 0
    }
}

/// Sizes positions under a validated [`RiskPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct RiskManager {
    policy: RiskPolicy,
}

impl RiskManager {
    /// Fails with [`ConfigError::InvalidRiskPolicy`] for out-of-range parameters.
    pub fn new(policy: RiskPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Recommendation for a long entry at `close`.
    ///
    /// A non-positive per-share risk (or a non-positive close) yields a zero
    /// quantity rather than an error.
    pub fn recommend(&self, close: f64) -> RiskRecommendation {
        let p = &self.policy;
        let per_share_risk = close * p.stop_loss_fraction;
        let stop_loss = close - per_share_risk;
        let take_profit = close * (1.0 + p.stop_loss_fraction * p.reward_risk_ratio);
        let trailing_stop = close * (1.0 - p.trailing_stop_fraction);

        let quantity = if per_share_risk > 0.0 && close > 0.0 {
            let by_risk = affordable_units(p.risk_budget(), per_share_risk);
            let by_cash = affordable_units(p.capital, close);
            by_risk.min(by_cash)
        } else {
            log::debug!("per-share risk {per_share_risk} at close {close}: no position");
            0
        };

        let shares = quantity as f64;
        let reward_risk = if per_share_risk > 0.0 {
            (take_profit - close) / per_share_risk
        } else {
            0.0
        };

        RiskRecommendation {
            quantity,
            entry_price: close,
            stop_loss,
            take_profit,
            trailing_stop,
            capital_at_risk: shares * per_share_risk.max(0.0),
            position_value: shares * close,
            potential_gain: shares * (take_profit - close),
            reward_risk,
        }
    }
}

/// Largest whole quantity with `units * unit_cost <= limit`, evaluated in
/// the same floating-point expression the recommendation reports.
fn affordable_units(limit: f64, unit_cost: f64) -> u64 {
    let mut units = whole_units(limit / unit_cost);
    while units > 0 && units as f64 * unit_cost > limit {
        units -= 1;
    }
    units
}

fn whole_units(x: f64) -> u64 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    let nearest = x.round();
    let units = if (x - nearest).abs() < QUANTITY_SNAP {
        nearest
    } else {
        x.floor()
    };
    units.min(MAX_EXACT_UNITS) as u64
}
