use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The full set of financial metrics derived for one property.
///
/// This struct is the final output of the `MetricsEngine` and serves as the
/// data transfer object for deal figures throughout the entire system. It
/// carries no reference back to the originating record; the caller joins the
/// two by address. All ratios are unrounded decimal fractions (0.05 = 5%) —
/// rounding and percent/currency formatting happen at presentation time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    // I. Financing
    pub loan_amount: Decimal,
    /// 0 when no financing is modeled (cash purchase or zero term).
    pub monthly_mortgage_payment: Decimal,
    pub annual_debt_service: Decimal,
    pub loan_to_value: Decimal,

    // II. Income
    /// Annual rent after the vacancy allowance and management fee.
    pub effective_gross_income: Decimal,
    /// Effective income minus operating expenses, excluding debt service.
    pub net_operating_income: Decimal,
    pub annual_cash_flow: Decimal,
    pub monthly_cash_flow: Decimal,

    // III. Return ratios
    pub cap_rate: Decimal,
    pub gross_rental_yield: Decimal,
    /// None when no cash was invested (zero down payment and closing costs).
    pub cash_on_cash_return: Option<Decimal>,
    /// None is the explicit no-debt sentinel, never a numeric infinity.
    pub dscr: Option<Decimal>,

    // IV. Rules of thumb
    /// Price over annual rent. None when the property collects no rent.
    pub gross_rent_multiplier: Option<Decimal>,
    /// Operating expenses over gross annual rent. None when rent is 0.
    pub operating_expense_ratio: Option<Decimal>,
    /// The monthly rent at which cash flow is exactly zero, given the same
    /// vacancy and management assumptions. None when those assumptions
    /// consume the entire rent.
    pub breakeven_monthly_rent: Option<Decimal>,
    /// Whether monthly rent is at least 1% of the purchase price.
    pub passes_one_percent_rule: bool,
}
