use crate::engine::MetricsEngine;
use crate::error::MetricsError;
use configuration::DealAssumptions;
use core_types::PropertyRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The input a sensitivity sweep perturbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensitivityVariable {
    /// Monthly rent, scaled by `1 + change`.
    Rent,
    /// Monthly operating expenses, scaled by `1 + change`.
    Expenses,
    /// Purchase price, scaled by `1 + change`.
    Price,
    /// Mortgage rate, shifted by `change` in absolute points (0.01 = +1pp).
    InterestRate,
}

/// Cash-on-cash return under one perturbation of the base case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub change: Decimal,
    pub cash_on_cash: Option<Decimal>,
    /// Difference against the unperturbed deal; None when either side has no
    /// cash invested.
    pub delta: Option<Decimal>,
}

impl MetricsEngine {
    /// Recomputes cash-on-cash return under each perturbation of a single
    /// input. A perturbation that produces an invalid record (e.g. a price
    /// pushed to zero or below) fails the sweep rather than being skipped.
    pub fn sensitivity(
        &self,
        record: &PropertyRecord,
        assumptions: &DealAssumptions,
        variable: SensitivityVariable,
        changes: &[Decimal],
    ) -> Result<Vec<SensitivityPoint>, MetricsError> {
        let base = self.compute(record, assumptions)?;

        changes
            .iter()
            .map(|&change| {
                let mut modified = record.clone();
                let mut modified_assumptions = *assumptions;
                let factor = Decimal::ONE + change;

                match variable {
                    SensitivityVariable::Rent => modified.monthly_rent *= factor,
                    SensitivityVariable::Expenses => modified.monthly_expenses *= factor,
                    SensitivityVariable::Price => modified.purchase_price *= factor,
                    SensitivityVariable::InterestRate => {
                        // Shift whichever rate is actually in effect.
                        match modified_assumptions.interest_rate_override {
                            Some(rate) => {
                                modified_assumptions.interest_rate_override = Some(rate + change)
                            }
                            None => modified.financing.annual_interest_rate += change,
                        }
                    }
                }

                let metrics = self.compute(&modified, &modified_assumptions)?;
                let delta = match (metrics.cash_on_cash_return, base.cash_on_cash_return) {
                    (Some(perturbed), Some(base_coc)) => Some(perturbed - base_coc),
                    _ => None,
                };

                Ok(SensitivityPoint {
                    change,
                    cash_on_cash: metrics.cash_on_cash_return,
                    delta,
                })
            })
            .collect()
    }
}
