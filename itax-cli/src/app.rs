use std::fmt::Display;

use anyhow::{Context, Result, anyhow};
use itax_core::db::{RepositoryError, RepositoryRegistry, SessionRepository};
use itax_core::intake::parse_financial_input;
use itax_core::{NewSession, ParseMode, RawFinancialInput, RegimeAnalytics, TaxEngine};
use itax_db_sqlite::SqliteRepositoryFactory;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::report::{ComputeReport, OutputFormat, SessionReport, to_json};

/// Registry with every backend compiled into the binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Computes each record in order. With `repo`, every computation is stored
/// as a new session and its id is attached to the report.
///
/// Strict-mode validation stops at the first invalid record; nothing after it
/// is computed or stored.
pub async fn compute_records(
    engine: &TaxEngine,
    records: &[RawFinancialInput],
    mode: ParseMode,
    repo: Option<&dyn SessionRepository>,
) -> Result<Vec<ComputeReport>> {
    let mut reports = Vec::with_capacity(records.len());

    for (idx, raw) in records.iter().enumerate() {
        let row = idx + 1;
        let input = parse_financial_input(raw, mode).with_context(|| format!("record {row}"))?;
        let comparison = engine.compare(&input);

        let session_id = match repo {
            Some(repo) => {
                let stored = repo
                    .create_session(NewSession::generate(input, comparison.clone().into()))
                    .await
                    .with_context(|| format!("failed to save record {row}"))?;
                info!(session_id = %stored.session_id, "session saved");
                Some(stored.session_id)
            }
            None => None,
        };

        debug!(row, best = %comparison.best_regime, "record computed");
        reports.push(ComputeReport {
            session_id,
            comparison,
        });
    }

    Ok(reports)
}

pub async fn session_report(
    repo: &dyn SessionRepository,
    session_id: Uuid,
) -> Result<SessionReport> {
    let record = repo.get_session(session_id).await.map_err(|e| match e {
        RepositoryError::NotFound => anyhow!("session {session_id} not found"),
        other => anyhow::Error::new(other).context("failed to load session"),
    })?;
    let conversation = repo
        .list_messages(session_id)
        .await
        .context("failed to load conversation log")?;

    Ok(SessionReport {
        record,
        conversation,
    })
}

pub async fn session_ids(repo: &dyn SessionRepository) -> Result<Vec<Uuid>> {
    repo.list_session_ids()
        .await
        .context("failed to list sessions")
}

pub async fn analytics(repo: &dyn SessionRepository) -> Result<RegimeAnalytics> {
    repo.regime_analytics()
        .await
        .context("failed to aggregate sessions")
}

pub fn render<T: Display + Serialize>(
    value: &T,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(value.to_string()),
        OutputFormat::Json => to_json(value).context("failed to serialise output"),
    }
}

/// Table output is each item's `Display` separated by a blank line; JSON is a
/// single pretty-printed array.
pub fn render_all<T: Display + Serialize>(
    values: &[T],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")),
        OutputFormat::Json => to_json(&values).context("failed to serialise output"),
    }
}
