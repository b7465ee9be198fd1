use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FinancialInput, TaxResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub input: FinancialInput,
    pub result: TaxResult,
    pub created_at: DateTime<Utc>,
}

/// For storing a fresh computation (no timestamp yet).
/// The caller generates `session_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub session_id: Uuid,
    pub input: FinancialInput,
    pub result: TaxResult,
}

impl NewSession {
    /// Wraps a computation under a newly generated v4 identifier.
    pub fn generate(
        input: FinancialInput,
        result: TaxResult,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            input,
            result,
        }
    }
}
