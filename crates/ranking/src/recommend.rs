use crate::{RankingEngine, ScoreRecord, SubScores};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Coarse risk grade derived from the debt-coverage and cash-flow sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        };
        write!(f, "{}", label)
    }
}

/// A shortlisted deal with the reasons for and against it.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub address: String,
    pub rank: usize,
    pub composite_score: Decimal,
    /// Metrics scoring at or above 0.7.
    pub strengths: Vec<String>,
    /// Metrics scoring at or below 0.4.
    pub weaknesses: Vec<String>,
    pub risk: RiskLevel,
}

const STRENGTH_THRESHOLD: Decimal = dec!(0.7);
const WEAKNESS_THRESHOLD: Decimal = dec!(0.4);

impl RankingEngine {
    /// Picks the top `top_n` ranked deals and annotates each with its
    /// strongest and weakest metrics plus a risk grade.
    pub fn recommendations(&self, ranked: &[ScoreRecord], top_n: usize) -> Vec<Recommendation> {
        ranked
            .iter()
            .take(top_n)
            .map(|record| Recommendation {
                address: record.address.clone(),
                rank: record.rank,
                composite_score: record.composite_score,
                strengths: describe(&record.sub_scores, Verdict::Strength),
                weaknesses: describe(&record.sub_scores, Verdict::Weakness),
                risk: assess_risk(&record.sub_scores),
            })
            .collect()
    }
}

enum Verdict {
    Strength,
    Weakness,
}

fn describe(scores: &SubScores, verdict: Verdict) -> Vec<String> {
    let labelled = [
        (scores.cap_rate, "capitalisation rate", "Attractive", "Poor"),
        (scores.cash_flow, "cash flow", "Strong", "Weak"),
        (scores.cash_on_cash, "cash-on-cash return", "Strong", "Low"),
        (scores.dscr, "debt coverage", "Comfortable", "Thin"),
        (scores.gross_yield, "rental yield", "High", "Low"),
    ];

    labelled
        .iter()
        .filter_map(|&(score, metric, strong, weak)| match verdict {
            Verdict::Strength if score >= STRENGTH_THRESHOLD => {
                Some(format!("{} {}", strong, metric))
            }
            Verdict::Weakness if score <= WEAKNESS_THRESHOLD => {
                Some(format!("{} {}", weak, metric))
            }
            _ => None,
        })
        .collect()
}

/// Debt coverage dominates the risk read, cash flow comes second; the other
/// sub-scores describe return, not risk.
fn assess_risk(scores: &SubScores) -> RiskLevel {
    let mut risk_points = 0u32;

    if scores.dscr < dec!(0.4) {
        risk_points += 30;
    } else if scores.dscr < dec!(0.6) {
        risk_points += 15;
    }

    if scores.cash_flow < dec!(0.4) {
        risk_points += 25;
    } else if scores.cash_flow < dec!(0.6) {
        risk_points += 10;
    }

    if risk_points >= 50 {
        RiskLevel::High
    } else if risk_points >= 25 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
