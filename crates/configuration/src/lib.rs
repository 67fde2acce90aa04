use crate::error::ConfigError;
use rust_decimal::Decimal;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalysisConfig, Benchmarks, DealAssumptions, ScoringWeights};

/// Loads the analysis configuration from the given TOML file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed
/// `AnalysisConfig` struct, validates it, and returns it. Every section is
/// optional; omitted sections fall back to documented defaults.
pub fn load_config(path: &str) -> Result<AnalysisConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?;

    let config = builder.try_deserialize::<AnalysisConfig>()?;
    validate(&config)?;

    Ok(config)
}

/// Structural checks that serde cannot express.
fn validate(config: &AnalysisConfig) -> Result<(), ConfigError> {
    let a = &config.assumptions;
    if a.vacancy_rate < Decimal::ZERO || a.vacancy_rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "assumptions.vacancy_rate must be a fraction in [0, 1], got {}",
            a.vacancy_rate
        )));
    }
    if a.management_fee_rate < Decimal::ZERO || a.management_fee_rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "assumptions.management_fee_rate must be a fraction in [0, 1], got {}",
            a.management_fee_rate
        )));
    }
    if a.closing_costs < Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "assumptions.closing_costs must not be negative, got {}",
            a.closing_costs
        )));
    }
    if let Some(rate) = a.interest_rate_override {
        if rate < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "assumptions.interest_rate_override must not be negative, got {}",
                rate
            )));
        }
    }

    let w = &config.weights;
    for (name, weight) in [
        ("cap_rate", w.cap_rate),
        ("cash_flow", w.cash_flow),
        ("cash_on_cash", w.cash_on_cash),
        ("dscr", w.dscr),
        ("gross_yield", w.gross_yield),
    ] {
        if weight < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "weights.{} must not be negative, got {}",
                name, weight
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_carry_the_standard_weight_mix() {
        let config = AnalysisConfig::default();
        assert_eq!(config.weights.cap_rate, dec!(0.25));
        assert_eq!(config.weights.cash_on_cash, dec!(0.30));
        assert_eq!(config.weights.gross_yield, Decimal::ZERO);
        assert_eq!(config.assumptions.vacancy_rate, dec!(0.05));
        assert!(config.benchmarks.cap_rate.is_none());
    }

    #[test]
    fn negative_weight_fails_validation() {
        let mut config = AnalysisConfig::default();
        config.weights.dscr = dec!(-0.1);
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn vacancy_rate_above_one_fails_validation() {
        let mut config = AnalysisConfig::default();
        config.assumptions.vacancy_rate = dec!(1.5);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn partial_weights_table_defaults_missing_metrics_to_zero() {
        let toml = "[weights]\ncap_rate = 0.6\n";
        let config: AnalysisConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.weights.cap_rate, dec!(0.6));
        assert_eq!(config.weights.cash_on_cash, Decimal::ZERO);
        assert_eq!(config.weights.dscr, Decimal::ZERO);
    }
}
