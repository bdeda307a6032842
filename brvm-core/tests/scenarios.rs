//! End-to-end scenarios: synthetic universes through the full pipeline.

use brvm_core::analysis::{analyze_universe, Analyzer};
use brvm_core::classify::SignalClassifier;
use brvm_core::config::{AnalysisConfig, ConfigError};
use brvm_core::domain::{PriceBar, PriceSeries, Signal};
use brvm_core::engine::IndicatorSet;
use brvm_core::error::ExclusionReason;
use brvm_core::explain::Observation;
use brvm_core::risk::{RiskManager, RiskPolicy};
use chrono::NaiveDate;

// ── Helpers ──────────────────────────────────────────────────────────

fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::from_close(base + chrono::Duration::days(i as i64), c, 5_000))
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

fn ramp(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn snapshot(close: f64, short_ma: f64, long_ma: f64, oscillator: f64) -> IndicatorSet {
    IndicatorSet {
        date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
        close,
        short_ma,
        long_ma,
        oscillator,
        change_pct: 0.0,
    }
}

// ── Pipeline scenarios ───────────────────────────────────────────────

#[test]
fn flat_market_holds_at_midpoint() {
    let report = analyze_universe(&[series("FLAT", &[100.0; 60])], &AnalysisConfig::default())
        .unwrap();
    let opp = &report.opportunities[0];

    approx(opp.indicators.oscillator, 50.0);
    assert_eq!(opp.signal, Signal::Hold);
    approx(opp.score, 50.0);
}

#[test]
fn steady_rise_is_a_buy() {
    let report = analyze_universe(
        &[series("RISE", &ramp(60, 50.0, 1.0))],
        &AnalysisConfig::default(),
    )
    .unwrap();
    let opp = &report.opportunities[0];

    approx(opp.indicators.short_ma, 99.5);
    approx(opp.indicators.long_ma, 84.5);
    approx(opp.indicators.oscillator, 100.0);
    assert_eq!(opp.signal, Signal::Buy);
    approx(opp.score, 70.0);
    assert!(opp.rationale.contains(&Observation::BullishTrend));
    assert!(matches!(opp.rationale[0], Observation::Overbought { .. }));
}

#[test]
fn steady_fall_is_a_sell() {
    let report = analyze_universe(
        &[series("FALL", &ramp(60, 109.0, -1.0))],
        &AnalysisConfig::default(),
    )
    .unwrap();
    let opp = &report.opportunities[0];

    approx(opp.indicators.oscillator, 0.0);
    assert_eq!(opp.signal, Signal::Sell);
    approx(opp.score, 30.0);
    assert!(matches!(opp.rationale.last(), Some(Observation::SharpDrop { .. })));
}

#[test]
fn extreme_snapshots_reach_strong_signals() {
    let classifier = SignalClassifier::default();
    assert_eq!(
        classifier.classify(&snapshot(95.0, 102.0, 100.0, 25.0)).unwrap(),
        Signal::StrongBuy
    );
    assert_eq!(
        classifier.classify(&snapshot(105.0, 98.0, 100.0, 75.0)).unwrap(),
        Signal::StrongSell
    );
}

#[test]
fn short_history_is_excluded_not_fatal() {
    let universe = vec![
        series("SHORT", &[100.0, 101.0, 102.0, 103.0, 104.0]),
        series("FLAT", &[100.0; 60]),
    ];
    let report = analyze_universe(&universe, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.opportunities.len(), 1);
    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.excluded[0].symbol, "SHORT");
    assert_eq!(
        report.excluded[0].reason,
        ExclusionReason::InsufficientHistory {
            required: 51,
            available: 5
        }
    );
}

#[test]
fn exact_required_history_is_enough() {
    let config = AnalysisConfig::default();
    let n = config.indicators.required_bars();
    let report = analyze_universe(&[series("EDGE", &ramp(n, 100.0, 0.5))], &config).unwrap();
    assert_eq!(report.opportunities.len(), 1);
    assert!(report.excluded.is_empty());
}

#[test]
fn invalid_policy_aborts_before_analysis() {
    let mut config = AnalysisConfig::default();
    config.risk = Some(RiskPolicy {
        risk_fraction: 0.0,
        ..RiskPolicy::default()
    });
    let result = analyze_universe(&[series("FLAT", &[100.0; 60])], &config);
    assert!(matches!(result, Err(ConfigError::InvalidRiskPolicy(_))));
}

#[test]
fn empty_universe_yields_empty_report() {
    let report = analyze_universe(&[], &AnalysisConfig::default()).unwrap();
    assert!(report.opportunities.is_empty());
    assert!(report.excluded.is_empty());
    assert_eq!(report.summary.analyzed, 0);
    assert_eq!(report.summary.best, None);
    assert_eq!(report.as_of, None);
}

// ── Risk sizing ──────────────────────────────────────────────────────

#[test]
fn reference_sizing_case() {
    let manager = RiskManager::new(RiskPolicy::with_capital(10_000.0)).unwrap();
    let rec = manager.recommend(100.0);

    assert_eq!(rec.quantity, 40);
    approx(rec.stop_loss, 95.0);
    approx(rec.take_profit, 110.0);
    approx(rec.trailing_stop, 97.0);
    approx(rec.capital_at_risk, 200.0);
    approx(rec.position_value, 4_000.0);
    approx(rec.potential_gain, 400.0);
    approx(rec.reward_risk, 2.0);
}

#[test]
fn close_just_above_round_number_stays_within_limits() {
    let close = 100.000_000_000_05;
    let cash_bound = RiskManager::new(RiskPolicy {
        risk_fraction: 1.0,
        stop_loss_fraction: 0.01,
        ..RiskPolicy::with_capital(10_000.0)
    })
    .unwrap()
    .recommend(close);
    assert!(cash_bound.quantity as f64 * close <= 10_000.0);

    let policy = RiskPolicy::with_capital(10_000.0);
    let risk_bound = RiskManager::new(policy).unwrap().recommend(close);
    assert!(risk_bound.capital_at_risk <= policy.risk_budget());
    assert_eq!(risk_bound.quantity, 39);
}

#[test]
fn cash_limits_expensive_instruments() {
    // Risk allows 6 shares but 10 000 only buys 3 at 3 000.
    let manager = RiskManager::new(RiskPolicy {
        risk_fraction: 0.10,
        ..RiskPolicy::with_capital(10_000.0)
    })
    .unwrap();
    let rec = manager.recommend(3_000.0);
    assert_eq!(rec.quantity, 3);
    approx(rec.position_value, 9_000.0);
}

#[test]
fn unaffordable_instrument_gets_zero_quantity() {
    let manager = RiskManager::new(RiskPolicy::with_capital(1_000.0)).unwrap();
    let rec = manager.recommend(25_000.0);
    assert_eq!(rec.quantity, 0);
    assert!(!rec.is_tradeable());
}

// ── Ordering and determinism ─────────────────────────────────────────

#[test]
fn equal_scores_rank_by_symbol() {
    let universe = vec![
        series("ORAC", &[100.0; 60]),
        series("BOAB", &[100.0; 60]),
        series("SNTS", &[100.0; 60]),
    ];
    let report = analyze_universe(&universe, &AnalysisConfig::default()).unwrap();
    let symbols: Vec<&str> = report.opportunities.iter().map(|o| o.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BOAB", "ORAC", "SNTS"]);
    assert_eq!(report.summary.best.as_deref(), Some("BOAB"));
}

#[test]
fn filters_apply_to_ranking_only() {
    let mut config = AnalysisConfig::default();
    config.filter.allowed_signals = [Signal::Buy].into_iter().collect();
    config.filter.limit = Some(1);
    let universe = vec![
        series("RISE", &ramp(60, 50.0, 1.0)),
        series("RISE2", &ramp(60, 500.0, 10.0)),
        series("FLAT", &[100.0; 60]),
        series("FALL", &ramp(60, 109.0, -1.0)),
    ];
    let report = analyze_universe(&universe, &config).unwrap();

    assert_eq!(report.opportunities.len(), 1);
    assert_eq!(report.opportunities[0].signal, Signal::Buy);
    assert_eq!(report.summary.analyzed, 4);
    assert_eq!(report.summary.bullish_count(), 2);
}

fn mixed_universe() -> Vec<PriceSeries> {
    (0..25)
        .map(|k| {
            let closes: Vec<f64> = (0..120)
                .map(|i| {
                    let wave = ((i as f64) * 0.2 + k as f64).sin() * 150.0;
                    let drift = (k as f64 - 12.0) * i as f64 * 0.8;
                    (3_000.0 + wave + drift).max(50.0)
                })
                .collect();
            series(&format!("BRVM{k:02}"), &closes)
        })
        .chain(std::iter::once(series("TINY", &[1_000.0; 10])))
        .collect()
}

#[test]
fn repeated_runs_are_identical() {
    let universe = mixed_universe();
    let config = AnalysisConfig::default();
    let first = serde_json::to_string(&analyze_universe(&universe, &config).unwrap()).unwrap();
    let second = serde_json::to_string(&analyze_universe(&universe, &config).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn scheduling_does_not_change_results() {
    let universe = mixed_universe();
    let parallel = Analyzer::new(AnalysisConfig::default()).unwrap().analyze(&universe);
    let sequential = Analyzer::new(AnalysisConfig::default().sequential())
        .unwrap()
        .analyze(&universe);

    assert_eq!(
        serde_json::to_string(&parallel).unwrap(),
        serde_json::to_string(&sequential).unwrap()
    );
    assert_eq!(parallel.run_id, sequential.run_id);
}

#[test]
fn every_opportunity_is_consistent() {
    let report = analyze_universe(&mixed_universe(), &AnalysisConfig::default()).unwrap();
    assert!(!report.opportunities.is_empty());
    for opp in &report.opportunities {
        assert!(opp.is_consistent(), "{} scored {} as {}", opp.symbol, opp.score, opp.signal);
        let risk = opp.risk.expect("default config sizes positions");
        assert!(risk.quantity as f64 * opp.close <= 1_000_000.0);
        assert!(risk.capital_at_risk <= RiskPolicy::default().risk_budget());
    }
}
