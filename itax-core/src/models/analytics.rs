use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate view over all stored sessions.
///
/// The regime counts are by the regime the user *selected*, not the one the
/// engine recommended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeAnalytics {
    pub num_sessions: u64,
    pub old_selected: u64,
    pub new_selected: u64,
    pub avg_tax_old: Decimal,
    pub avg_tax_new: Decimal,
}
