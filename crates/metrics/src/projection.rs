use crate::engine::MetricsEngine;
use crate::error::MetricsError;
use configuration::DealAssumptions;
use core_types::{CoreError, PropertyRecord};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One year of a forward cash-flow projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    pub monthly_rent: Decimal,
    pub monthly_expenses: Decimal,
    pub net_operating_income: Decimal,
    pub annual_cash_flow: Decimal,
    pub monthly_cash_flow: Decimal,
    /// Property value compounded at the assumed appreciation rate.
    pub projected_value: Decimal,
}

/// A compounded value path for one candidate appreciation rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppreciationScenario {
    pub appreciation_rate: Decimal,
    /// (year, projected value) pairs, year 1 first.
    pub values: Vec<(u32, Decimal)>,
}

impl MetricsEngine {
    /// Future value under cumulative compounding: `price * (1 + rate)^years`.
    ///
    /// Growth is always compounded per period; the linear approximation
    /// `price * (1 + rate * years)` understates multi-year appreciation and
    /// is deliberately not offered.
    pub fn project_value(&self, current_value: Decimal, rate: Decimal, years: u32) -> Decimal {
        current_value * (Decimal::ONE + rate).powi(years as i64)
    }

    /// Value paths for several candidate appreciation rates.
    pub fn appreciation_scenarios(
        &self,
        current_value: Decimal,
        rates: &[Decimal],
        years: u32,
    ) -> Vec<AppreciationScenario> {
        rates
            .iter()
            .map(|&rate| AppreciationScenario {
                appreciation_rate: rate,
                values: (1..=years)
                    .map(|year| (year, self.project_value(current_value, rate, year)))
                    .collect(),
            })
            .collect()
    }

    /// Projects cash flow year by year with compounding rent and expense
    /// growth. Debt service stays fixed for the life of the loan; vacancy and
    /// management assumptions apply to each projected year's rent.
    pub fn project_cash_flows(
        &self,
        record: &PropertyRecord,
        assumptions: &DealAssumptions,
        years: u32,
        rent_growth: Decimal,
        expense_growth: Decimal,
    ) -> Result<Vec<YearProjection>, MetricsError> {
        if rent_growth <= dec!(-1) {
            return Err(CoreError::InvalidInput(
                "rent_growth".to_string(),
                format!("must be greater than -1, got {}", rent_growth),
            )
            .into());
        }
        if expense_growth <= dec!(-1) {
            return Err(CoreError::InvalidInput(
                "expense_growth".to_string(),
                format!("must be greater than -1, got {}", expense_growth),
            )
            .into());
        }

        let base = self.compute(record, assumptions)?;
        let annual_debt_service = base.annual_debt_service;

        let projections = (1..=years)
            .map(|year| {
                let monthly_rent =
                    record.monthly_rent * (Decimal::ONE + rent_growth).powi(year as i64);
                let monthly_expenses =
                    record.monthly_expenses * (Decimal::ONE + expense_growth).powi(year as i64);

                let effective_rent = monthly_rent
                    * dec!(12)
                    * (Decimal::ONE - assumptions.vacancy_rate);
                let management_fee = effective_rent * assumptions.management_fee_rate;
                let net_operating_income =
                    effective_rent - management_fee - monthly_expenses * dec!(12);
                let annual_cash_flow = net_operating_income - annual_debt_service;

                YearProjection {
                    year,
                    monthly_rent,
                    monthly_expenses,
                    net_operating_income,
                    annual_cash_flow,
                    monthly_cash_flow: annual_cash_flow / dec!(12),
                    projected_value: self.project_value(
                        record.purchase_price,
                        assumptions.appreciation_rate,
                        year,
                    ),
                }
            })
            .collect();

        Ok(projections)
    }
}
