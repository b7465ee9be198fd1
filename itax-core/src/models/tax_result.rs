use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// Outcome of one engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax_old: Decimal,
    pub tax_new: Decimal,
    pub best_regime: Regime,
}

/// Working for a single regime, from deductions down to the final liability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeBreakdown {
    pub regime: Regime,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    /// Tax from the slab schedule, before cess.
    pub slab_tax: Decimal,
    pub cess: Decimal,
    /// `slab_tax + cess`, rounded to paise.
    pub total_tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComparison {
    pub old: RegimeBreakdown,
    pub new: RegimeBreakdown,
    pub best_regime: Regime,
}

impl TaxComparison {
    /// How much cheaper the recommended regime is.
    pub fn savings(&self) -> Decimal {
        (self.old.total_tax - self.new.total_tax).abs()
    }

    pub fn breakdown(
        &self,
        regime: Regime,
    ) -> &RegimeBreakdown {
        match regime {
            Regime::Old => &self.old,
            Regime::New => &self.new,
        }
    }
}

impl From<TaxComparison> for TaxResult {
    fn from(comparison: TaxComparison) -> Self {
        TaxResult {
            tax_old: comparison.old.total_tax,
            tax_new: comparison.new.total_tax,
            best_regime: comparison.best_regime,
        }
    }
}
