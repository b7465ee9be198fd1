pub mod advisory;
pub mod calculations;
pub mod db;
pub mod intake;
pub mod models;

pub use calculations::TaxEngine;
pub use db::repository::{RepositoryError, SessionRepository};
pub use intake::{FieldValue, ParseMode, RawFinancialInput, ValidationError};
pub use models::*;
