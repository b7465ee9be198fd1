//! Progressive slab schedules for the two regimes.
//!
//! # Old regime
//!
//! | Taxable income          | Rate |
//! |-------------------------|------|
//! | up to 2,50,000          | 0%   |
//! | 2,50,000 – 5,00,000     | 5%   |
//! | 5,00,000 – 10,00,000    | 20%  |
//! | above 10,00,000         | 30%  |
//!
//! # New regime
//!
//! | Taxable income          | Rate |
//! |-------------------------|------|
//! | up to 3,00,000          | 0%   |
//! | 3,00,000 – 6,00,000     | 5%   |
//! | 6,00,000 – 9,00,000     | 10%  |
//! | 9,00,000 – 12,00,000    | 15%  |
//! | 12,00,000 – 15,00,000   | 20%  |
//! | above 15,00,000         | 30%  |
//!
//! Each rate applies only to the part of income inside its band.

use rust_decimal::Decimal;

use crate::calculations::common::non_negative;
use crate::models::{SlabSchedule, TaxSlab};

fn slab(
    lower: i64,
    upper: Option<i64>,
    rate_percent: i64,
) -> TaxSlab {
    TaxSlab {
        lower: Decimal::from(lower),
        upper: upper.map(Decimal::from),
        rate: Decimal::new(rate_percent, 2),
    }
}

impl TaxSlab {
    /// Tax owed on the part of `taxable_income` that falls inside this slab.
    pub fn tax_within(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let ceiling = match self.upper {
            Some(upper) => taxable_income.min(upper),
            None => taxable_income,
        };
        non_negative(ceiling - self.lower) * self.rate
    }
}

impl SlabSchedule {
    pub fn old_regime() -> Self {
        Self {
            slabs: vec![
                slab(0, Some(250_000), 0),
                slab(250_000, Some(500_000), 5),
                slab(500_000, Some(1_000_000), 20),
                slab(1_000_000, None, 30),
            ],
        }
    }

    pub fn new_regime() -> Self {
        Self {
            slabs: vec![
                slab(0, Some(300_000), 0),
                slab(300_000, Some(600_000), 5),
                slab(600_000, Some(900_000), 10),
                slab(900_000, Some(1_200_000), 15),
                slab(1_200_000, Some(1_500_000), 20),
                slab(1_500_000, None, 30),
            ],
        }
    }

    /// Sum of every slab's contribution. Unrounded, before cess.
    pub fn tax_on(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.slabs
            .iter()
            .map(|s| s.tax_within(taxable_income))
            .sum()
    }
}
