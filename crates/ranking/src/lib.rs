//! # Keystone Ranking Engine
//!
//! Scores and ranks a set of already-computed metric bundles so that deals
//! become directly comparable. Sub-scores are min-max normalized within the
//! evaluated set (or centered on a market benchmark when one is supplied) and
//! combined into a weighted-average composite.
//!
//! Like the metrics engine, this crate is pure layer-1 logic: results are
//! created fresh per invocation and never mutated after return. Re-invoke the
//! engine whenever the input set or the weights change.

use crate::error::RankingError;
use configuration::{Benchmarks, ScoringWeights};
use metrics::MetricsBundle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

pub mod error;
pub mod recommend;

pub use recommend::{Recommendation, RiskLevel};

/// Per-metric normalized sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    pub cap_rate: Decimal,
    pub cash_flow: Decimal,
    pub cash_on_cash: Decimal,
    pub dscr: Decimal,
    pub gross_yield: Decimal,
}

/// One property's scoring result within the evaluated set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub address: String,
    pub sub_scores: SubScores,
    /// Weighted average of the sub-scores, in [0, 1].
    pub composite_score: Decimal,
    /// 1-indexed position after the stable descending sort.
    pub rank: usize,
}

/// The main scoring and ranking engine.
pub struct RankingEngine {
    weights: ScoringWeights,
    benchmarks: Benchmarks,
}

impl RankingEngine {
    /// Builds an engine, rejecting any negative weight up front. Weights need
    /// not sum to 1; the composite divides by their total.
    pub fn new(weights: ScoringWeights, benchmarks: Benchmarks) -> Result<Self, RankingError> {
        for (name, weight) in [
            ("cap_rate", weights.cap_rate),
            ("cash_flow", weights.cash_flow),
            ("cash_on_cash", weights.cash_on_cash),
            ("dscr", weights.dscr),
            ("gross_yield", weights.gross_yield),
        ] {
            if weight < Decimal::ZERO {
                return Err(RankingError::InvalidWeight(name.to_string(), weight));
            }
        }
        Ok(Self {
            weights,
            benchmarks,
        })
    }

    /// Scores and ranks the given (address, metrics) pairs.
    ///
    /// Results come back sorted descending by composite score; ties keep the
    /// original input order.
    pub fn rank(
        &self,
        entries: &[(String, MetricsBundle)],
    ) -> Result<Vec<ScoreRecord>, RankingError> {
        if entries.is_empty() {
            return Err(RankingError::EmptyInput);
        }

        // --- 1. Normalize each metric across the set ---
        // DSCR's no-debt sentinel scores 1.0 (unlevered income trivially
        // covers zero debt); a missing cash-on-cash scores a neutral 0.5.
        let cap_rate = self.column_scores(
            entries,
            |b| Some(b.cap_rate),
            self.benchmarks.cap_rate,
            dec!(0.5),
        );
        let cash_flow = self.column_scores(
            entries,
            |b| Some(b.monthly_cash_flow),
            self.benchmarks.cash_flow,
            dec!(0.5),
        );
        let cash_on_cash = self.column_scores(
            entries,
            |b| b.cash_on_cash_return,
            self.benchmarks.cash_on_cash,
            dec!(0.5),
        );
        let dscr = self.column_scores(entries, |b| b.dscr, self.benchmarks.dscr, Decimal::ONE);
        let gross_yield = self.column_scores(
            entries,
            |b| Some(b.gross_rental_yield),
            self.benchmarks.gross_yield,
            dec!(0.5),
        );

        // --- 2. Composite: weighted average, so uniform weight scaling is a no-op ---
        let w = &self.weights;
        let total_weight =
            w.cap_rate + w.cash_flow + w.cash_on_cash + w.dscr + w.gross_yield;

        let mut records: Vec<ScoreRecord> = entries
            .iter()
            .enumerate()
            .map(|(i, (address, _))| {
                let sub_scores = SubScores {
                    cap_rate: cap_rate[i],
                    cash_flow: cash_flow[i],
                    cash_on_cash: cash_on_cash[i],
                    dscr: dscr[i],
                    gross_yield: gross_yield[i],
                };
                let composite_score = if total_weight.is_zero() {
                    Decimal::ZERO
                } else {
                    (sub_scores.cap_rate * w.cap_rate
                        + sub_scores.cash_flow * w.cash_flow
                        + sub_scores.cash_on_cash * w.cash_on_cash
                        + sub_scores.dscr * w.dscr
                        + sub_scores.gross_yield * w.gross_yield)
                        / total_weight
                };
                ScoreRecord {
                    address: address.clone(),
                    sub_scores,
                    composite_score,
                    rank: 0,
                }
            })
            .collect();

        // --- 3. Stable descending sort, then 1-indexed ranks ---
        records.sort_by(|a, b| b.composite_score.cmp(&a.composite_score));
        for (i, record) in records.iter_mut().enumerate() {
            record.rank = i + 1;
        }

        debug!(properties = records.len(), "ranked property set");
        Ok(records)
    }

    /// Normalizes one metric across the set.
    ///
    /// With a (non-zero) benchmark, scores center on it: at-benchmark maps to
    /// 0.5, clamped into [0, 1]. Otherwise min-max over the values present;
    /// a constant column scores 0.5 everywhere rather than rewarding or
    /// punishing a metric that cannot discriminate.
    fn column_scores<F>(
        &self,
        entries: &[(String, MetricsBundle)],
        accessor: F,
        benchmark: Option<Decimal>,
        missing_score: Decimal,
    ) -> Vec<Decimal>
    where
        F: Fn(&MetricsBundle) -> Option<Decimal>,
    {
        // A zero benchmark cannot be normalized against; fall back to min-max.
        if let Some(benchmark) = benchmark.filter(|b| !b.is_zero()) {
            return entries
                .iter()
                .map(|(_, bundle)| match accessor(bundle) {
                    Some(value) => ((value - benchmark) / benchmark + dec!(0.5))
                        .clamp(Decimal::ZERO, Decimal::ONE),
                    None => missing_score,
                })
                .collect();
        }

        let (min, max, present) = entries
            .iter()
            .filter_map(|(_, bundle)| accessor(bundle))
            .fold(
                (Decimal::MAX, Decimal::MIN, 0usize),
                |(min, max, count), value| (min.min(value), max.max(value), count + 1),
            );

        entries
            .iter()
            .map(|(_, bundle)| match accessor(bundle) {
                Some(value) => {
                    if present == 0 || min == max {
                        dec!(0.5)
                    } else {
                        (value - min) / (max - min)
                    }
                }
                None => missing_score,
            })
            .collect()
    }
}
