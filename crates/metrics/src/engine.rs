use crate::bundle::MetricsBundle;
use crate::error::MetricsError;
use configuration::DealAssumptions;
use core_types::{CoreError, PropertyRecord};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use tracing::debug;

/// A stateless calculator for deriving financial metrics from a property record.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for deriving a property's financial metrics.
    ///
    /// Validates the record and assumptions first (fail fast, no partial
    /// results), then derives every metric in one pass. Intermediate values
    /// are never rounded; chained calculations keep full precision.
    ///
    /// # Arguments
    ///
    /// * `record` - The property under evaluation.
    /// * `assumptions` - Deal-level assumptions (vacancy, fees, overrides).
    ///
    /// # Returns
    ///
    /// A `Result` containing the `MetricsBundle` or a `MetricsError`.
    pub fn compute(
        &self,
        record: &PropertyRecord,
        assumptions: &DealAssumptions,
    ) -> Result<MetricsBundle, MetricsError> {
        record.validate()?;
        validate_assumptions(assumptions)?;

        // --- 1. Financing ---
        let annual_rate = assumptions
            .interest_rate_override
            .unwrap_or(record.financing.annual_interest_rate);
        let loan_amount = record.loan_amount();
        let monthly_mortgage_payment =
            mortgage_payment(loan_amount, annual_rate, record.financing.term_months);
        let annual_debt_service = monthly_mortgage_payment * dec!(12);
        let loan_to_value = loan_amount / record.purchase_price;

        // --- 2. Income ---
        let gross_annual_rent = record.annual_rent();
        let effective_rent = gross_annual_rent * (Decimal::ONE - assumptions.vacancy_rate);
        let management_fee = effective_rent * assumptions.management_fee_rate;
        let effective_gross_income = effective_rent - management_fee;
        let net_operating_income = effective_gross_income - record.annual_expenses();

        // --- 3. Cash flow ---
        let annual_cash_flow = net_operating_income - annual_debt_service;
        let monthly_cash_flow = annual_cash_flow / dec!(12);

        // --- 4. Return ratios ---
        let cap_rate = net_operating_income / record.purchase_price;
        let gross_rental_yield = gross_annual_rent / record.purchase_price;

        let cash_invested = record.down_payment() + assumptions.closing_costs;
        let cash_on_cash_return = if cash_invested > Decimal::ZERO {
            Some(annual_cash_flow / cash_invested)
        } else {
            None
        };

        // No-debt deals report the sentinel, never a numeric infinity.
        let dscr = if monthly_mortgage_payment.is_zero() {
            None
        } else {
            Some(net_operating_income / annual_debt_service)
        };

        // --- 5. Rules of thumb ---
        let gross_rent_multiplier = if gross_annual_rent > Decimal::ZERO {
            Some(record.purchase_price / gross_annual_rent)
        } else {
            None
        };
        let operating_expense_ratio = if gross_annual_rent > Decimal::ZERO {
            Some(record.annual_expenses() / gross_annual_rent)
        } else {
            None
        };

        // Rent required for zero cash flow under the same vacancy and
        // management assumptions.
        let retained_fraction = (Decimal::ONE - assumptions.vacancy_rate)
            * (Decimal::ONE - assumptions.management_fee_rate);
        let breakeven_monthly_rent = if retained_fraction > Decimal::ZERO {
            Some(
                (record.annual_expenses() + annual_debt_service) / retained_fraction / dec!(12),
            )
        } else {
            None
        };

        let passes_one_percent_rule =
            record.monthly_rent >= record.purchase_price * dec!(0.01);

        debug!(
            address = %record.address,
            %net_operating_income,
            %monthly_cash_flow,
            "computed metrics"
        );

        Ok(MetricsBundle {
            loan_amount,
            monthly_mortgage_payment,
            annual_debt_service,
            loan_to_value,
            effective_gross_income,
            net_operating_income,
            annual_cash_flow,
            monthly_cash_flow,
            cap_rate,
            gross_rental_yield,
            cash_on_cash_return,
            dscr,
            gross_rent_multiplier,
            operating_expense_ratio,
            breakeven_monthly_rent,
            passes_one_percent_rule,
        })
    }
}

/// Standard amortizing-loan payment from principal, annual rate, and term.
///
/// A zero rate degrades to straight-line repayment; a zero term or zero
/// principal means no financing is modeled and the payment is 0.
pub fn mortgage_payment(principal: Decimal, annual_rate: Decimal, term_months: u32) -> Decimal {
    if principal <= Decimal::ZERO || term_months == 0 {
        return Decimal::ZERO;
    }
    if annual_rate.is_zero() {
        return principal / Decimal::from(term_months);
    }

    let monthly_rate = annual_rate / dec!(12);
    let growth = (Decimal::ONE + monthly_rate).powi(term_months as i64);
    principal * monthly_rate * growth / (growth - Decimal::ONE)
}

/// Assumption checks the type system cannot express. Defaults only ever apply
/// to absent assumptions, never to out-of-range ones.
fn validate_assumptions(assumptions: &DealAssumptions) -> Result<(), MetricsError> {
    if assumptions.vacancy_rate < Decimal::ZERO || assumptions.vacancy_rate > Decimal::ONE {
        return Err(CoreError::InvalidInput(
            "vacancy_rate".to_string(),
            format!("must be a fraction in [0, 1], got {}", assumptions.vacancy_rate),
        )
        .into());
    }
    if assumptions.management_fee_rate < Decimal::ZERO
        || assumptions.management_fee_rate > Decimal::ONE
    {
        return Err(CoreError::InvalidInput(
            "management_fee_rate".to_string(),
            format!(
                "must be a fraction in [0, 1], got {}",
                assumptions.management_fee_rate
            ),
        )
        .into());
    }
    if assumptions.closing_costs < Decimal::ZERO {
        return Err(CoreError::InvalidInput(
            "closing_costs".to_string(),
            format!("must not be negative, got {}", assumptions.closing_costs),
        )
        .into());
    }
    if assumptions.appreciation_rate <= dec!(-1) {
        return Err(CoreError::InvalidInput(
            "appreciation_rate".to_string(),
            format!("must be greater than -1, got {}", assumptions.appreciation_rate),
        )
        .into());
    }
    if let Some(rate) = assumptions.interest_rate_override {
        if rate < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "interest_rate_override".to_string(),
                format!("must not be negative, got {}", rate),
            )
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{FinancingTerms, PropertyType};

    fn record(price: Decimal, rent: Decimal, expenses: Decimal, financing: FinancingTerms) -> PropertyRecord {
        PropertyRecord {
            address: "4 Mill Road, Manchester".to_string(),
            property_type: PropertyType::SemiDetached,
            purchase_price: price,
            monthly_rent: rent,
            monthly_expenses: expenses,
            financing,
            purchase_date: None,
        }
    }

    fn no_adjustments() -> DealAssumptions {
        DealAssumptions {
            vacancy_rate: Decimal::ZERO,
            management_fee_rate: Decimal::ZERO,
            ..DealAssumptions::default()
        }
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected} within {tolerance}, got {actual}"
        );
    }

    #[test]
    fn mortgage_payment_matches_the_standard_amortization_table() {
        // 200k principal, 5% annual, 30 years -> 1073.64/month.
        let payment = mortgage_payment(dec!(200000), dec!(0.05), 360);
        assert_close(payment, dec!(1073.64), dec!(0.01));
    }

    #[test]
    fn zero_rate_mortgage_is_straight_line() {
        let payment = mortgage_payment(dec!(120000), Decimal::ZERO, 240);
        assert_eq!(payment, dec!(500));
    }

    #[test]
    fn zero_term_means_no_financing() {
        assert_eq!(mortgage_payment(dec!(120000), dec!(0.05), 0), Decimal::ZERO);
    }

    #[test]
    fn compute_is_deterministic() {
        let engine = MetricsEngine::new();
        let record = record(
            dec!(250000),
            dec!(1400),
            dec!(300),
            FinancingTerms {
                down_payment_pct: dec!(0.25),
                annual_interest_rate: dec!(0.045),
                term_months: 300,
            },
        );
        let assumptions = DealAssumptions::default();
        let first = engine.compute(&record, &assumptions).unwrap();
        let second = engine.compute(&record, &assumptions).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn noi_applies_vacancy_and_management_fee() {
        let engine = MetricsEngine::new();
        let record = record(
            dec!(200000),
            dec!(1000),
            dec!(200),
            FinancingTerms::cash_purchase(),
        );
        let assumptions = DealAssumptions {
            vacancy_rate: dec!(0.05),
            management_fee_rate: dec!(0.10),
            ..DealAssumptions::default()
        };
        let metrics = engine.compute(&record, &assumptions).unwrap();

        // 12000 * 0.95 = 11400 effective rent; minus 10% fee = 10260;
        // minus 2400 expenses = 7860 NOI.
        assert_eq!(metrics.effective_gross_income, dec!(10260));
        assert_eq!(metrics.net_operating_income, dec!(7860));
        assert_eq!(metrics.cap_rate, dec!(0.0393));
    }

    #[test]
    fn dscr_sentinel_appears_exactly_when_there_is_no_debt() {
        let engine = MetricsEngine::new();
        let assumptions = no_adjustments();

        let cash = record(
            dec!(150000),
            dec!(800),
            dec!(150),
            FinancingTerms::cash_purchase(),
        );
        let metrics = engine.compute(&cash, &assumptions).unwrap();
        assert_eq!(metrics.monthly_mortgage_payment, Decimal::ZERO);
        assert!(metrics.dscr.is_none());

        let financed = record(
            dec!(150000),
            dec!(800),
            dec!(150),
            FinancingTerms {
                down_payment_pct: dec!(0.25),
                annual_interest_rate: dec!(0.05),
                term_months: 300,
            },
        );
        let metrics = engine.compute(&financed, &assumptions).unwrap();
        assert!(metrics.monthly_mortgage_payment > Decimal::ZERO);
        let dscr = metrics.dscr.unwrap();
        assert_eq!(
            dscr,
            metrics.net_operating_income / metrics.annual_debt_service
        );
    }

    #[test]
    fn yields_are_non_negative_for_valid_inputs() {
        let engine = MetricsEngine::new();
        let record = record(
            dec!(90000),
            Decimal::ZERO,
            Decimal::ZERO,
            FinancingTerms::cash_purchase(),
        );
        let metrics = engine.compute(&record, &no_adjustments()).unwrap();
        assert!(metrics.gross_rental_yield >= Decimal::ZERO);
        assert_eq!(metrics.gross_rent_multiplier, None);
        assert_eq!(metrics.operating_expense_ratio, None);
    }

    #[test]
    fn cash_on_cash_uses_invested_cash_not_price() {
        let engine = MetricsEngine::new();
        let record = record(
            dec!(200000),
            dec!(1200),
            dec!(200),
            FinancingTerms {
                down_payment_pct: dec!(0.25),
                annual_interest_rate: Decimal::ZERO,
                term_months: 300,
            },
        );
        let assumptions = DealAssumptions {
            closing_costs: dec!(5000),
            vacancy_rate: Decimal::ZERO,
            management_fee_rate: Decimal::ZERO,
            ..DealAssumptions::default()
        };
        let metrics = engine.compute(&record, &assumptions).unwrap();

        // NOI = 14400 - 2400 = 12000; debt service = 150000/300*12 = 6000.
        // Cash flow 6000 over 55000 invested.
        let coc = metrics.cash_on_cash_return.unwrap();
        assert_close(coc, dec!(6000) / dec!(55000), dec!(0.0000001));
    }

    #[test]
    fn no_cash_invested_reports_no_cash_on_cash() {
        let engine = MetricsEngine::new();
        let record = record(
            dec!(200000),
            dec!(1200),
            dec!(200),
            FinancingTerms {
                down_payment_pct: Decimal::ZERO,
                annual_interest_rate: dec!(0.05),
                term_months: 360,
            },
        );
        let metrics = engine.compute(&record, &no_adjustments()).unwrap();
        assert!(metrics.cash_on_cash_return.is_none());
    }

    #[test]
    fn interest_rate_override_replaces_the_record_rate() {
        let engine = MetricsEngine::new();
        let record = record(
            dec!(200000),
            dec!(1200),
            dec!(200),
            FinancingTerms {
                down_payment_pct: dec!(0.25),
                annual_interest_rate: dec!(0.05),
                term_months: 300,
            },
        );
        let overridden = DealAssumptions {
            interest_rate_override: Some(Decimal::ZERO),
            ..no_adjustments()
        };
        let metrics = engine.compute(&record, &overridden).unwrap();
        // Straight-line at 0%: 150000 / 300.
        assert_eq!(metrics.monthly_mortgage_payment, dec!(500));
    }

    #[test]
    fn breakeven_rent_covers_expenses_and_debt_with_the_vacancy_buffer() {
        let engine = MetricsEngine::new();
        let record = record(
            dec!(200000),
            dec!(1200),
            dec!(200),
            FinancingTerms {
                down_payment_pct: dec!(0.25),
                annual_interest_rate: Decimal::ZERO,
                term_months: 300,
            },
        );
        let assumptions = DealAssumptions {
            vacancy_rate: dec!(0.05),
            management_fee_rate: Decimal::ZERO,
            ..DealAssumptions::default()
        };
        let metrics = engine.compute(&record, &assumptions).unwrap();

        // (2400 expenses + 6000 debt service) / 0.95 / 12.
        let breakeven = metrics.breakeven_monthly_rent.unwrap();
        assert_close(breakeven, dec!(8400) / dec!(0.95) / dec!(12), dec!(0.0000001));

        // A property renting exactly at breakeven cash flows to zero.
        let mut at_breakeven = record.clone();
        at_breakeven.monthly_rent = breakeven;
        let check = engine.compute(&at_breakeven, &assumptions).unwrap();
        assert_close(check.annual_cash_flow, Decimal::ZERO, dec!(0.0000001));
    }

    #[test]
    fn one_percent_rule_is_a_strict_threshold() {
        let engine = MetricsEngine::new();
        let assumptions = no_adjustments();

        let passing = record(
            dec!(100000),
            dec!(1000),
            dec!(100),
            FinancingTerms::cash_purchase(),
        );
        assert!(engine.compute(&passing, &assumptions).unwrap().passes_one_percent_rule);

        let failing = record(
            dec!(100000),
            dec!(999),
            dec!(100),
            FinancingTerms::cash_purchase(),
        );
        assert!(!engine.compute(&failing, &assumptions).unwrap().passes_one_percent_rule);
    }

    #[test]
    fn invalid_record_fails_before_any_computation() {
        let engine = MetricsEngine::new();
        let record = record(
            Decimal::ZERO,
            dec!(1000),
            dec!(100),
            FinancingTerms::cash_purchase(),
        );
        assert!(matches!(
            engine.compute(&record, &DealAssumptions::default()),
            Err(MetricsError::InvalidInput(_))
        ));
    }

    #[test]
    fn out_of_range_vacancy_rate_is_rejected() {
        let engine = MetricsEngine::new();
        let record = record(
            dec!(100000),
            dec!(1000),
            dec!(100),
            FinancingTerms::cash_purchase(),
        );
        let assumptions = DealAssumptions {
            vacancy_rate: dec!(1.2),
            ..DealAssumptions::default()
        };
        assert!(engine.compute(&record, &assumptions).is_err());
    }
}
