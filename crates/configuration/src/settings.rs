use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for an analysis run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Deal-level assumptions applied to every property.
    #[serde(default)]
    pub assumptions: DealAssumptions,
    /// Weights for the multi-metric composite score.
    #[serde(default)]
    pub weights: ScoringWeights,
    /// Optional market benchmarks used instead of set-relative normalization.
    #[serde(default)]
    pub benchmarks: Benchmarks,
}

/// Underwriting assumptions layered on top of a property record.
///
/// All rates are decimal fractions (0.05 means 5%). These are the only inputs
/// that may be defaulted; required record fields never are.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DealAssumptions {
    /// Overrides the record's mortgage rate when testing refinance scenarios.
    #[serde(default)]
    pub interest_rate_override: Option<Decimal>,
    /// The fraction of gross rent lost to vacancy.
    #[serde(default = "default_vacancy_rate")]
    pub vacancy_rate: Decimal,
    /// Letting-agent fee as a fraction of effective rent.
    #[serde(default)]
    pub management_fee_rate: Decimal,
    /// Expected annual capital appreciation, compounded per year.
    #[serde(default = "default_appreciation_rate")]
    pub appreciation_rate: Decimal,
    /// One-off purchase costs (legal, survey, stamp duty) counted as cash in.
    #[serde(default)]
    pub closing_costs: Decimal,
}

fn default_vacancy_rate() -> Decimal {
    dec!(0.05)
}

fn default_appreciation_rate() -> Decimal {
    dec!(0.03)
}

impl Default for DealAssumptions {
    fn default() -> Self {
        Self {
            interest_rate_override: None,
            vacancy_rate: default_vacancy_rate(),
            management_fee_rate: Decimal::ZERO,
            appreciation_rate: default_appreciation_rate(),
            closing_costs: Decimal::ZERO,
        }
    }
}

/// Weights for the scoring function.
///
/// Weights need not sum to 1; the composite divides by the total. A metric
/// omitted from the `[weights]` table deserializes to 0 and is excluded from
/// the composite while still being reported as a sub-score.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScoringWeights {
    #[serde(default)]
    pub cap_rate: Decimal,
    #[serde(default)]
    pub cash_flow: Decimal,
    #[serde(default)]
    pub cash_on_cash: Decimal,
    #[serde(default)]
    pub dscr: Decimal,
    #[serde(default)]
    pub gross_yield: Decimal,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            cap_rate: dec!(0.25),
            cash_flow: dec!(0.25),
            cash_on_cash: dec!(0.30),
            dscr: dec!(0.20),
            gross_yield: Decimal::ZERO,
        }
    }
}

/// Market reference points. When a benchmark is present for a metric, scores
/// center on it (at-benchmark normalizes to 0.5) instead of the set's range.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Benchmarks {
    #[serde(default)]
    pub cap_rate: Option<Decimal>,
    #[serde(default)]
    pub cash_flow: Option<Decimal>,
    #[serde(default)]
    pub cash_on_cash: Option<Decimal>,
    #[serde(default)]
    pub dscr: Option<Decimal>,
    #[serde(default)]
    pub gross_yield: Option<Decimal>,
}
