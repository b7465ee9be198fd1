//! Tax calculation for the old and new Indian income-tax regimes.
//!
//! [`slabs`] holds the progressive schedules, [`engine`] applies deductions,
//! slabs and cess, and [`common`] has the rounding helpers both use.

pub mod common;
pub mod engine;
pub mod slabs;

pub use engine::{CESS_RATE, TaxEngine};
