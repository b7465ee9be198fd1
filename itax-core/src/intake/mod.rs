//! Conversion of loosely typed field mappings into [`FinancialInput`].
//!
//! Upstream collaborators (forms, CSV files, extraction stubs) hand over a
//! string-keyed map whose values are either numbers or text. Two policies are
//! available:
//!
//! * [`ParseMode::BestEffort`]: missing, blank, non-numeric, negative and
//!   out-of-range amounts become zero, each with a `warn!` record. Never fails.
//! * [`ParseMode::Strict`]: every field must be present and valid. All
//!   problems are collected into one [`ValidationError`].
//!
//! Text amounts are trimmed and may use `,` as a thousands separator.
//! Amounts above [`MAX_AMOUNT`] are out of range; below that bound the sums
//! and products in the engine cannot overflow.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{FinancialInput, Regime};

/// A single raw value as supplied by an input source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Decimal),
    Text(String),
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

pub type RawFinancialInput = HashMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMode {
    #[default]
    BestEffort,
    Strict,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestEffort => "best-effort",
            Self::Strict => "strict",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parse mode '{0}' (expected 'best-effort' or 'strict')")]
pub struct UnknownParseMode(pub String);

impl FromStr for ParseMode {
    type Err = UnknownParseMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" | "best_effort" => Ok(Self::BestEffort),
            "strict" => Ok(Self::Strict),
            _ => Err(UnknownParseMode(s.to_string())),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IssueKind {
    #[error("missing")]
    MissingField,

    #[error("not a number")]
    NonNumericField,

    #[error("negative amount")]
    NegativeAmount,

    #[error("exceeds 10^15")]
    AmountTooLarge,

    #[error("not 'old' or 'new'")]
    UnknownRegime,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {kind}")]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
}

/// Every offending field found by a strict parse, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid financial input: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn has_issue(
        &self,
        field: &str,
        kind: IssueKind,
    ) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.field == field && issue.kind == kind)
    }
}

/// Largest accepted amount: 10^15 rupees.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Removes surrounding whitespace and thousands separators.
fn normalize_amount(s: &str) -> String {
    s.trim().replace(',', "")
}

fn read_amount(value: Option<&FieldValue>) -> Result<Decimal, IssueKind> {
    let amount = match value {
        None => return Err(IssueKind::MissingField),
        Some(FieldValue::Number(n)) => *n,
        Some(FieldValue::Text(text)) => {
            let normalized = normalize_amount(text);
            if normalized.is_empty() {
                return Err(IssueKind::MissingField);
            }
            normalized
                .parse::<Decimal>()
                .map_err(|_| IssueKind::NonNumericField)?
        }
    };

    if amount < Decimal::ZERO {
        return Err(IssueKind::NegativeAmount);
    }
    if amount > MAX_AMOUNT {
        return Err(IssueKind::AmountTooLarge);
    }
    Ok(amount)
}

fn read_regime(value: Option<&FieldValue>) -> Result<Regime, IssueKind> {
    match value {
        None => Err(IssueKind::MissingField),
        Some(FieldValue::Text(text)) if text.trim().is_empty() => Err(IssueKind::MissingField),
        Some(FieldValue::Text(text)) => Regime::parse(text).ok_or(IssueKind::UnknownRegime),
        Some(FieldValue::Number(_)) => Err(IssueKind::UnknownRegime),
    }
}

/// Builds a [`FinancialInput`] from `raw` under the given policy.
///
/// Keys that are not FinancialInput field names are ignored.
///
/// # Errors
///
/// Only in [`ParseMode::Strict`]; best-effort parsing always succeeds.
pub fn parse_financial_input(
    raw: &RawFinancialInput,
    mode: ParseMode,
) -> Result<FinancialInput, ValidationError> {
    let mut input = FinancialInput::default();
    let mut issues = Vec::new();

    for field in FinancialInput::AMOUNT_FIELDS {
        match read_amount(raw.get(field)) {
            Ok(amount) => {
                input.set_amount(field, amount);
            }
            Err(kind) => match mode {
                ParseMode::Strict => issues.push(FieldIssue {
                    field: field.to_string(),
                    kind,
                }),
                // A missing field is the normal case for sparse sources.
                ParseMode::BestEffort if kind == IssueKind::MissingField => {}
                ParseMode::BestEffort => {
                    warn!(field, reason = %kind, "amount coerced to zero");
                }
            },
        }
    }

    let regime_field = FinancialInput::SELECTED_REGIME_FIELD;
    match read_regime(raw.get(regime_field)) {
        Ok(regime) => input.selected_regime = regime,
        Err(kind) => match mode {
            ParseMode::Strict => issues.push(FieldIssue {
                field: regime_field.to_string(),
                kind,
            }),
            ParseMode::BestEffort => {
                if kind != IssueKind::MissingField {
                    warn!(field = regime_field, reason = %kind, "selected regime defaulted to new");
                }
                input.selected_regime = Regime::default();
            }
        },
    }

    if issues.is_empty() {
        Ok(input)
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawFinancialInput {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect()
    }

    fn complete() -> RawFinancialInput {
        raw(&[
            ("gross_salary", "1200000.00"),
            ("basic_salary", "600000.00"),
            ("hra_received", "200000.00"),
            ("rent_paid", "180000.00"),
            ("deduction_80c", "150000.00"),
            ("deduction_80d", "25000.00"),
            ("standard_deduction", "50000.00"),
            ("professional_tax", "2500.00"),
            ("tds", "90000.00"),
            ("selected_regime", "new"),
        ])
    }

    // =========================================================================
    // ParseMode
    // =========================================================================

    #[test]
    fn parse_mode_from_str_accepts_both_spellings() {
        assert_eq!("strict".parse::<ParseMode>(), Ok(ParseMode::Strict));
        assert_eq!("Best-Effort".parse::<ParseMode>(), Ok(ParseMode::BestEffort));
        assert_eq!("best_effort".parse::<ParseMode>(), Ok(ParseMode::BestEffort));
    }

    #[test]
    fn parse_mode_from_str_rejects_unknown() {
        assert_eq!(
            "lenient".parse::<ParseMode>(),
            Err(UnknownParseMode("lenient".to_string()))
        );
    }

    // =========================================================================
    // best effort
    // =========================================================================

    #[test]
    fn best_effort_reads_complete_record() {
        let input = parse_financial_input(&complete(), ParseMode::BestEffort).unwrap();

        assert_eq!(input.gross_salary, dec!(1200000.00));
        assert_eq!(input.tds, dec!(90000.00));
        assert_eq!(input.selected_regime, Regime::New);
    }

    #[test]
    fn best_effort_defaults_missing_fields_to_zero() {
        let input =
            parse_financial_input(&raw(&[("gross_salary", "500000")]), ParseMode::BestEffort)
                .unwrap();

        assert_eq!(
            input,
            FinancialInput {
                gross_salary: dec!(500000),
                ..FinancialInput::default()
            }
        );
    }

    #[test]
    fn best_effort_coerces_garbage_and_negatives_to_zero() {
        let input = parse_financial_input(
            &raw(&[
                ("gross_salary", "lots"),
                ("hra_received", "-5000"),
                ("selected_regime", "legacy"),
            ]),
            ParseMode::BestEffort,
        )
        .unwrap();

        assert_eq!(input.gross_salary, Decimal::ZERO);
        assert_eq!(input.hra_received, Decimal::ZERO);
        assert_eq!(input.selected_regime, Regime::New);
    }

    #[test]
    fn max_amount_is_ten_to_the_fifteenth() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
    }

    #[test]
    fn amounts_above_bound_are_zero_in_best_effort() {
        let mut fields = raw(&[
            ("gross_salary", "1000000000000000"),
            ("standard_deduction", "50000000000000000000000000000"),
        ]);
        fields.insert("hra_received".to_string(), FieldValue::from(Decimal::MAX));

        let input = parse_financial_input(&fields, ParseMode::BestEffort).unwrap();

        assert_eq!(input.gross_salary, dec!(1000000000000000));
        assert_eq!(input.standard_deduction, Decimal::ZERO);
        assert_eq!(input.hra_received, Decimal::ZERO);
    }

    #[test]
    fn strict_reports_amounts_above_bound() {
        let mut fields = complete();
        fields.insert(
            "deduction_80d".to_string(),
            FieldValue::from("1,000,000,000,000,000.01"),
        );

        let err = parse_financial_input(&fields, ParseMode::Strict).unwrap_err();

        assert_eq!(
            err.issues,
            vec![FieldIssue {
                field: "deduction_80d".to_string(),
                kind: IssueKind::AmountTooLarge,
            }]
        );
    }

    #[test]
    fn best_effort_accepts_thousands_separators_and_whitespace() {
        let input = parse_financial_input(
            &raw(&[("gross_salary", "  12,00,000.50 ")]),
            ParseMode::BestEffort,
        )
        .unwrap();

        assert_eq!(input.gross_salary, dec!(1200000.50));
    }

    #[test]
    fn numeric_values_are_taken_as_is() {
        let mut map = RawFinancialInput::new();
        map.insert("gross_salary".to_string(), FieldValue::from(dec!(750000.25)));

        let input = parse_financial_input(&map, ParseMode::BestEffort).unwrap();

        assert_eq!(input.gross_salary, dec!(750000.25));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut map = complete();
        map.insert("pdf_filename".to_string(), FieldValue::from("form16.pdf"));

        let result = parse_financial_input(&map, ParseMode::Strict);

        assert!(result.is_ok());
    }

    // =========================================================================
    // strict
    // =========================================================================

    #[test]
    fn strict_accepts_complete_record() {
        let input = parse_financial_input(&complete(), ParseMode::Strict).unwrap();

        assert_eq!(input.professional_tax, dec!(2500.00));
    }

    #[test]
    fn strict_reports_every_offending_field() {
        let mut map = complete();
        map.remove("tds");
        map.insert("gross_salary".to_string(), FieldValue::from("twelve lakh"));
        map.insert("deduction_80c".to_string(), FieldValue::from("-1"));
        map.insert("selected_regime".to_string(), FieldValue::from("both"));

        let err = parse_financial_input(&map, ParseMode::Strict).unwrap_err();

        assert_eq!(err.issues.len(), 4);
        assert!(err.has_issue("gross_salary", IssueKind::NonNumericField));
        assert!(err.has_issue("deduction_80c", IssueKind::NegativeAmount));
        assert!(err.has_issue("tds", IssueKind::MissingField));
        assert!(err.has_issue("selected_regime", IssueKind::UnknownRegime));
    }

    #[test]
    fn strict_treats_blank_text_as_missing() {
        let mut map = complete();
        map.insert("rent_paid".to_string(), FieldValue::from("   "));

        let err = parse_financial_input(&map, ParseMode::Strict).unwrap_err();

        assert_eq!(
            err.issues,
            vec![FieldIssue {
                field: "rent_paid".to_string(),
                kind: IssueKind::MissingField,
            }]
        );
    }

    #[test]
    fn validation_error_message_lists_fields() {
        let err = parse_financial_input(&RawFinancialInput::new(), ParseMode::Strict).unwrap_err();

        let message = err.to_string();

        assert!(message.starts_with("invalid financial input: gross_salary: missing"));
        assert!(message.contains("selected_regime: missing"));
        assert_eq!(err.issues.len(), 10);
    }
}
