use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// Salary and deduction figures for one taxpayer, in rupees.
///
/// Only `gross_salary`, `standard_deduction`, `hra_received`,
/// `professional_tax`, `deduction_80c` and `deduction_80d` take part in the
/// tax computation. `basic_salary`, `rent_paid` and `tds` are carried so they
/// can be stored and shown back to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialInput {
    pub gross_salary: Decimal,
    pub basic_salary: Decimal,
    pub hra_received: Decimal,
    pub rent_paid: Decimal,
    pub deduction_80c: Decimal,
    pub deduction_80d: Decimal,
    pub standard_deduction: Decimal,
    pub professional_tax: Decimal,
    pub tds: Decimal,
    pub selected_regime: Regime,
}

impl FinancialInput {
    /// Names of the currency fields, in storage and display order.
    pub const AMOUNT_FIELDS: [&'static str; 9] = [
        "gross_salary",
        "basic_salary",
        "hra_received",
        "rent_paid",
        "deduction_80c",
        "deduction_80d",
        "standard_deduction",
        "professional_tax",
        "tds",
    ];

    pub const SELECTED_REGIME_FIELD: &'static str = "selected_regime";

    /// Every currency field paired with its name, ordered as [`Self::AMOUNT_FIELDS`].
    pub fn amounts(&self) -> [(&'static str, Decimal); 9] {
        [
            ("gross_salary", self.gross_salary),
            ("basic_salary", self.basic_salary),
            ("hra_received", self.hra_received),
            ("rent_paid", self.rent_paid),
            ("deduction_80c", self.deduction_80c),
            ("deduction_80d", self.deduction_80d),
            ("standard_deduction", self.standard_deduction),
            ("professional_tax", self.professional_tax),
            ("tds", self.tds),
        ]
    }

    /// Sets the currency field called `field`. Returns `false` for an unknown name.
    pub fn set_amount(
        &mut self,
        field: &str,
        value: Decimal,
    ) -> bool {
        let slot = match field {
            "gross_salary" => &mut self.gross_salary,
            "basic_salary" => &mut self.basic_salary,
            "hra_received" => &mut self.hra_received,
            "rent_paid" => &mut self.rent_paid,
            "deduction_80c" => &mut self.deduction_80c,
            "deduction_80d" => &mut self.deduction_80d,
            "standard_deduction" => &mut self.standard_deduction,
            "professional_tax" => &mut self.professional_tax,
            "tds" => &mut self.tds,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Deductions allowed under the old regime.
    ///
    /// `rent_paid` is deliberately absent: HRA is deducted as received, not
    /// through the rent-based exemption formula.
    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn old_regime_deductions(&self) -> Decimal {
        [
            self.hra_received,
            self.professional_tax,
            self.deduction_80c,
            self.deduction_80d,
        ]
        .into_iter()
        .fold(self.standard_deduction, Decimal::saturating_add)
    }

    /// Deductions allowed under the new regime (standard deduction only).
    pub fn new_regime_deductions(&self) -> Decimal {
        self.standard_deduction
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample() -> FinancialInput {
        FinancialInput {
            gross_salary: dec!(1200000),
            basic_salary: dec!(600000),
            hra_received: dec!(200000),
            rent_paid: dec!(180000),
            deduction_80c: dec!(150000),
            deduction_80d: dec!(25000),
            standard_deduction: dec!(50000),
            professional_tax: dec!(2500),
            tds: dec!(90000),
            selected_regime: Regime::New,
        }
    }

    #[test]
    fn old_regime_deductions_sum_five_fields() {
        assert_eq!(sample().old_regime_deductions(), dec!(427500));
    }

    #[test]
    fn old_regime_deductions_ignore_rent_basic_and_tds() {
        let input = FinancialInput {
            rent_paid: dec!(999999),
            basic_salary: dec!(999999),
            tds: dec!(999999),
            ..sample()
        };

        assert_eq!(input.old_regime_deductions(), dec!(427500));
    }

    #[test]
    fn new_regime_deductions_are_standard_only() {
        assert_eq!(sample().new_regime_deductions(), dec!(50000));
    }

    #[test]
    fn amounts_follow_field_order() {
        let names: Vec<&str> = sample().amounts().iter().map(|(name, _)| *name).collect();

        assert_eq!(names, FinancialInput::AMOUNT_FIELDS.to_vec());
    }

    #[test]
    fn set_amount_updates_named_field() {
        let mut input = FinancialInput::default();

        assert!(input.set_amount("deduction_80d", dec!(12000)));
        assert_eq!(input.deduction_80d, dec!(12000));
    }

    #[test]
    fn set_amount_rejects_unknown_field() {
        let mut input = FinancialInput::default();

        assert!(!input.set_amount("bonus", dec!(1)));
        assert_eq!(input, FinancialInput::default());
    }
}
