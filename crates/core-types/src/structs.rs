use crate::enums::PropertyType;
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The financing terms agreed for a purchase.
///
/// All rates are decimal fractions (0.05 means 5%), never percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    /// The fraction of the purchase price paid up front, in [0, 1].
    /// 1.0 models an all-cash purchase.
    pub down_payment_pct: Decimal,
    /// The annual mortgage interest rate as a fraction.
    pub annual_interest_rate: Decimal,
    /// The amortization term in months. 0 means no financing is modeled.
    pub term_months: u32,
}

impl FinancingTerms {
    /// Terms describing an all-cash purchase with no loan.
    pub fn cash_purchase() -> Self {
        Self {
            down_payment_pct: Decimal::ONE,
            annual_interest_rate: Decimal::ZERO,
            term_months: 0,
        }
    }
}

/// A single property under evaluation.
///
/// Records are externally owned: the persistence layer supplies them and the
/// engines treat them as read-only inputs. The `address` doubles as the
/// identifier when joining metrics and scores back to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub address: String,
    pub property_type: PropertyType,
    pub purchase_price: Decimal,
    pub monthly_rent: Decimal,
    pub monthly_expenses: Decimal,
    pub financing: FinancingTerms,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
}

impl PropertyRecord {
    /// Checks the record's numeric invariants, failing fast on the first
    /// violation. Required fields are never silently defaulted.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "purchase_price".to_string(),
                format!("must be greater than 0, got {}", self.purchase_price),
            ));
        }
        if self.monthly_rent < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "monthly_rent".to_string(),
                format!("must not be negative, got {}", self.monthly_rent),
            ));
        }
        if self.monthly_expenses < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "monthly_expenses".to_string(),
                format!("must not be negative, got {}", self.monthly_expenses),
            ));
        }
        if self.financing.down_payment_pct < Decimal::ZERO
            || self.financing.down_payment_pct > Decimal::ONE
        {
            return Err(CoreError::InvalidInput(
                "down_payment_pct".to_string(),
                format!(
                    "must be a fraction in [0, 1], got {}",
                    self.financing.down_payment_pct
                ),
            ));
        }
        if self.financing.annual_interest_rate < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "annual_interest_rate".to_string(),
                format!(
                    "must not be negative, got {}",
                    self.financing.annual_interest_rate
                ),
            ));
        }
        Ok(())
    }

    /// The cash paid up front, excluding closing costs.
    pub fn down_payment(&self) -> Decimal {
        self.purchase_price * self.financing.down_payment_pct
    }

    /// The principal borrowed against the property.
    pub fn loan_amount(&self) -> Decimal {
        self.purchase_price * (Decimal::ONE - self.financing.down_payment_pct)
    }

    pub fn annual_rent(&self) -> Decimal {
        self.monthly_rent * dec!(12)
    }

    pub fn annual_expenses(&self) -> Decimal {
        self.monthly_expenses * dec!(12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PropertyRecord {
        PropertyRecord {
            address: "12 Garnet Street, Leeds".to_string(),
            property_type: PropertyType::Terraced,
            purchase_price: dec!(180000),
            monthly_rent: dec!(950),
            monthly_expenses: dec!(210),
            financing: FinancingTerms {
                down_payment_pct: dec!(0.25),
                annual_interest_rate: dec!(0.05),
                term_months: 300,
            },
            purchase_date: None,
        }
    }

    #[test]
    fn valid_record_passes_validation() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut record = sample_record();
        record.purchase_price = Decimal::ZERO;
        assert!(matches!(
            record.validate(),
            Err(CoreError::InvalidInput(field, _)) if field == "purchase_price"
        ));
    }

    #[test]
    fn negative_rent_is_rejected() {
        let mut record = sample_record();
        record.monthly_rent = dec!(-1);
        assert!(record.validate().is_err());
    }

    #[test]
    fn down_payment_fraction_outside_unit_interval_is_rejected() {
        let mut record = sample_record();
        record.financing.down_payment_pct = dec!(1.1);
        assert!(record.validate().is_err());
        record.financing.down_payment_pct = dec!(-0.1);
        assert!(record.validate().is_err());
    }

    #[test]
    fn loan_splits_the_price_with_the_down_payment() {
        let record = sample_record();
        assert_eq!(record.down_payment(), dec!(45000));
        assert_eq!(record.loan_amount(), dec!(135000));
        assert_eq!(record.down_payment() + record.loan_amount(), record.purchase_price);
    }

    #[test]
    fn cash_purchase_has_no_loan() {
        let mut record = sample_record();
        record.financing = FinancingTerms::cash_purchase();
        assert_eq!(record.loan_amount(), Decimal::ZERO);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn property_type_round_trips_through_display_labels() {
        let json = serde_json::to_string(&PropertyType::FlatApartment).unwrap();
        assert_eq!(json, "\"Flat/Apartment\"");
    }
}
