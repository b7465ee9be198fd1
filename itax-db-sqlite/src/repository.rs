use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use itax_core::calculations::common::round_to_paise;
use itax_core::{
    ConversationMessage, FinancialInput, MessageKind, MessageRole, NewSession, Regime,
    RegimeAnalytics, RepositoryError, SessionRecord, SessionRepository, TaxResult,
};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use crate::decimal::{decimal_to_f64, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Accepts a bare file path (`itax.db`), `:memory:`, or a sqlx URL
    /// (`sqlite:itax.db?mode=rwc`). Missing database files are created.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid SQLite connection string: {}", database_url))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_session_exists(
        &self,
        session_id: Uuid,
    ) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1 FROM user_financials WHERE session_id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn get_text(
    row: &SqliteRow,
    column: &str,
) -> Result<String, RepositoryError> {
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get {}: {}", column, e)))
}

fn parse_uuid(text: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(text)
        .map_err(|e| RepositoryError::Database(format!("Invalid session id '{}': {}", text, e)))
}

fn parse_regime(text: &str) -> Result<Regime, RepositoryError> {
    Regime::parse(text)
        .ok_or_else(|| RepositoryError::Database(format!("Invalid regime: {}", text)))
}

fn row_to_session(row: &SqliteRow) -> Result<SessionRecord, RepositoryError> {
    let mut input = FinancialInput {
        selected_regime: parse_regime(&get_text(row, "selected_regime")?)?,
        ..FinancialInput::default()
    };
    for field in FinancialInput::AMOUNT_FIELDS {
        input.set_amount(field, get_decimal(row, field)?);
    }

    Ok(SessionRecord {
        session_id: parse_uuid(&get_text(row, "session_id")?)?,
        input,
        result: TaxResult {
            tax_old: get_decimal(row, "tax_old_regime")?,
            tax_new: get_decimal(row, "tax_new_regime")?,
            best_regime: parse_regime(&get_text(row, "best_regime")?)?,
        },
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
    })
}

fn row_to_message(row: &SqliteRow) -> Result<ConversationMessage, RepositoryError> {
    let role = get_text(row, "role")?;
    let kind = get_text(row, "kind")?;
    Ok(ConversationMessage {
        role: MessageRole::parse(&role)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid role: {}", role)))?,
        kind: MessageKind::parse(&kind)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid message kind: {}", kind)))?,
        content: get_text(row, "content")?,
    })
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn create_session(
        &self,
        session: NewSession,
    ) -> Result<SessionRecord, RepositoryError> {
        let now = Utc::now();
        let id = session.session_id.to_string();
        let input = &session.input;

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            "INSERT INTO user_financials (
                session_id, gross_salary, basic_salary, hra_received, rent_paid,
                deduction_80c, deduction_80d, standard_deduction, professional_tax, tds,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(decimal_to_f64(input.gross_salary))
        .bind(decimal_to_f64(input.basic_salary))
        .bind(decimal_to_f64(input.hra_received))
        .bind(decimal_to_f64(input.rent_paid))
        .bind(decimal_to_f64(input.deduction_80c))
        .bind(decimal_to_f64(input.deduction_80d))
        .bind(decimal_to_f64(input.standard_deduction))
        .bind(decimal_to_f64(input.professional_tax))
        .bind(decimal_to_f64(input.tds))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query(
            "INSERT INTO tax_comparison (
                session_id, tax_old_regime, tax_new_regime, best_regime, selected_regime,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(decimal_to_f64(session.result.tax_old))
        .bind(decimal_to_f64(session.result.tax_new))
        .bind(session.result.best_regime.as_str())
        .bind(input.selected_regime.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        debug!(session_id = %id, "session stored");

        self.get_session(session.session_id).await
    }

    async fn get_session(
        &self,
        session_id: Uuid,
    ) -> Result<SessionRecord, RepositoryError> {
        let row = sqlx::query(
            "SELECT f.session_id, f.gross_salary, f.basic_salary, f.hra_received, f.rent_paid,
                    f.deduction_80c, f.deduction_80d, f.standard_deduction,
                    f.professional_tax, f.tds,
                    c.tax_old_regime, c.tax_new_regime, c.best_regime, c.selected_regime,
                    f.created_at
             FROM user_financials f
             JOIN tax_comparison c ON c.session_id = f.session_id
             WHERE f.session_id = ?",
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(RepositoryError::NotFound)?;

        row_to_session(&row)
    }

    async fn list_session_ids(&self) -> Result<Vec<Uuid>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id FROM user_financials ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(|row| parse_uuid(&get_text(row, "session_id")?))
            .collect()
    }

    async fn append_message(
        &self,
        session_id: Uuid,
        message: &ConversationMessage,
    ) -> Result<(), RepositoryError> {
        self.ensure_session_exists(session_id).await?;

        sqlx::query(
            "INSERT INTO ai_conversation (session_id, role, kind, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(session_id.to_string())
        .bind(message.role.as_str())
        .bind(message.kind.as_str())
        .bind(&message.content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn list_messages(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<ConversationMessage>, RepositoryError> {
        self.ensure_session_exists(session_id).await?;

        let rows = sqlx::query(
            "SELECT role, kind, content FROM ai_conversation
             WHERE session_id = ? ORDER BY id",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter().map(row_to_message).collect()
    }

    async fn regime_analytics(&self) -> Result<RegimeAnalytics, RepositoryError> {
        let rows =
            sqlx::query("SELECT selected_regime, tax_old_regime, tax_new_regime FROM tax_comparison")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        let mut analytics = RegimeAnalytics::default();
        let mut total_old = Decimal::ZERO;
        let mut total_new = Decimal::ZERO;

        for row in &rows {
            analytics.num_sessions += 1;
            match Regime::parse(&get_text(row, "selected_regime")?) {
                Some(Regime::Old) => analytics.old_selected += 1,
                Some(Regime::New) => analytics.new_selected += 1,
                None => {}
            }
            total_old += get_decimal(row, "tax_old_regime")?;
            total_new += get_decimal(row, "tax_new_regime")?;
        }

        if analytics.num_sessions > 0 {
            let count = Decimal::from(analytics.num_sessions);
            analytics.avg_tax_old = round_to_paise(total_old / count);
            analytics.avg_tax_new = round_to_paise(total_new / count);
        }

        Ok(analytics)
    }
}
