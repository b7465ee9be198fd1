mod analytics;
mod conversation;
mod financial_input;
mod regime;
mod session;
mod tax_result;
mod tax_slab;

pub use analytics::RegimeAnalytics;
pub use conversation::{ConversationMessage, MessageKind, MessageRole};
pub use financial_input::FinancialInput;
pub use regime::Regime;
pub use session::{NewSession, SessionRecord};
pub use tax_result::{RegimeBreakdown, TaxComparison, TaxResult};
pub use tax_slab::{SlabSchedule, TaxSlab};
