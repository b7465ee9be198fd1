//! Old-regime vs new-regime income tax comparison.
//!
//! # Computation
//!
//! | Step | Old regime | New regime |
//! |------|------------|------------|
//! | Deductions | standard + HRA received + professional tax + 80C + 80D | standard only |
//! | Taxable income | gross − deductions, minimum 0 | gross − deductions, minimum 0 |
//! | Slab tax | [`SlabSchedule::old_regime`] | [`SlabSchedule::new_regime`] |
//! | Final tax | slab tax × 1.04, rounded to paise | slab tax × 1.04, rounded to paise |
//!
//! The old regime is recommended only when it is strictly cheaper; a tie goes
//! to the new regime.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::{FinancialInput, Regime, TaxEngine};
//!
//! let input = FinancialInput {
//!     gross_salary: dec!(1200000),
//!     hra_received: dec!(200000),
//!     rent_paid: dec!(180000),
//!     deduction_80c: dec!(150000),
//!     deduction_80d: dec!(25000),
//!     standard_deduction: dec!(50000),
//!     professional_tax: dec!(2500),
//!     ..FinancialInput::default()
//! };
//!
//! let result = TaxEngine::default().compute(&input);
//!
//! assert_eq!(result.tax_old, dec!(69680.00));
//! assert_eq!(result.tax_new, dec!(85800.00));
//! assert_eq!(result.best_regime, Regime::Old);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{non_negative, round_to_paise};
use crate::intake::{self, ParseMode, RawFinancialInput, ValidationError};
use crate::models::{
    FinancialInput, Regime, RegimeBreakdown, SlabSchedule, TaxComparison, TaxResult,
};

/// Health and education cess, charged on slab tax under both regimes.
pub const CESS_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);

/// Stateless calculator; every call is independent of every other.
///
/// Holds only the immutable slab tables, so one instance can be shared across
/// threads freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxEngine {
    old_schedule: SlabSchedule,
    new_schedule: SlabSchedule,
}

impl Default for TaxEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxEngine {
    pub fn new() -> Self {
        Self {
            old_schedule: SlabSchedule::old_regime(),
            new_schedule: SlabSchedule::new_regime(),
        }
    }

    /// Tax under each regime and the cheaper of the two.
    pub fn compute(
        &self,
        input: &FinancialInput,
    ) -> TaxResult {
        self.compare(input).into()
    }

    /// Same as [`compute`](Self::compute), keeping each regime's working.
    pub fn compare(
        &self,
        input: &FinancialInput,
    ) -> TaxComparison {
        let old = self.old_regime(input);
        let new = self.new_regime(input);
        let best_regime = recommend(old.total_tax, new.total_tax);

        debug!(
            tax_old = %old.total_tax,
            tax_new = %new.total_tax,
            best = %best_regime,
            "compared regimes"
        );

        TaxComparison {
            old,
            new,
            best_regime,
        }
    }

    pub fn old_regime(
        &self,
        input: &FinancialInput,
    ) -> RegimeBreakdown {
        breakdown(
            Regime::Old,
            &self.old_schedule,
            input.gross_salary,
            input.old_regime_deductions(),
        )
    }

    pub fn new_regime(
        &self,
        input: &FinancialInput,
    ) -> RegimeBreakdown {
        breakdown(
            Regime::New,
            &self.new_schedule,
            input.gross_salary,
            input.new_regime_deductions(),
        )
    }

    /// Parses a raw field mapping and computes it.
    ///
    /// # Errors
    ///
    /// Only in [`ParseMode::Strict`], when the mapping fails validation.
    pub fn compute_raw(
        &self,
        raw: &RawFinancialInput,
        mode: ParseMode,
    ) -> Result<TaxResult, ValidationError> {
        let input = intake::parse_financial_input(raw, mode)?;
        Ok(self.compute(&input))
    }
}

fn breakdown(
    regime: Regime,
    schedule: &SlabSchedule,
    gross_salary: Decimal,
    total_deductions: Decimal,
) -> RegimeBreakdown {
    let taxable_income = non_negative(gross_salary.saturating_sub(total_deductions));
    let raw_slab_tax = schedule.tax_on(taxable_income);
    let total_tax = round_to_paise(raw_slab_tax.saturating_mul(Decimal::ONE + CESS_RATE));
    let slab_tax = round_to_paise(raw_slab_tax);

    RegimeBreakdown {
        regime,
        total_deductions,
        taxable_income,
        slab_tax,
        // Derived so that slab_tax + cess == total_tax exactly.
        cess: total_tax - slab_tax,
        total_tax,
    }
}

fn recommend(
    tax_old: Decimal,
    tax_new: Decimal,
) -> Regime {
    if tax_old < tax_new {
        Regime::Old
    } else {
        Regime::New
    }
}
