use itax_core::RepositoryError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

fn column_error(
    column: &str,
    detail: impl std::fmt::Display,
) -> RepositoryError {
    RepositoryError::Database(format!("column '{}': {}", column, detail))
}

/// Reads a currency column stored as REAL, also accepting INTEGER (SQLite
/// stores whole-number REALs written by hand as integers). NULL reads as zero.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| column_error(column, e))?;

    if value_ref.is_null() {
        return Ok(Decimal::ZERO);
    }

    let type_name = value_ref.type_info().name().to_string();
    match type_name.as_str() {
        "INTEGER" => row
            .try_get::<i64, _>(column)
            .map(Decimal::from)
            .map_err(|e| column_error(column, e)),
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| column_error(column, e))?;
            Decimal::try_from(val).map_err(|e| column_error(column, format!("{val} is not a decimal: {e}")))
        }
        other => Err(column_error(column, format!("unexpected type '{other}'"))),
    }
}

/// Converts for REAL storage. Amounts beyond f64 range are stored as zero.
pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn pool_with(insert: &str) -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query("CREATE TABLE amounts (id INTEGER PRIMARY KEY, amount, label TEXT)")
            .execute(&pool)
            .await
            .expect("Failed to create test table");
        sqlx::query(insert)
            .execute(&pool)
            .await
            .expect("Failed to insert test data");
        pool
    }

    async fn read(
        insert: &str,
        column: &str,
    ) -> Result<Decimal, RepositoryError> {
        let pool = pool_with(insert).await;
        let row = sqlx::query("SELECT * FROM amounts WHERE id = 1")
            .fetch_one(&pool)
            .await
            .expect("Failed to fetch row");
        get_decimal(&row, column)
    }

    #[tokio::test]
    async fn reads_real_amount() {
        let result = read("INSERT INTO amounts (id, amount) VALUES (1, 69680.5)", "amount").await;

        assert_eq!(result, Ok(dec!(69680.5)));
    }

    #[tokio::test]
    async fn reads_integer_amount() {
        let result = read("INSERT INTO amounts (id, amount) VALUES (1, 1200000)", "amount").await;

        assert_eq!(result, Ok(dec!(1200000)));
    }

    #[tokio::test]
    async fn null_reads_as_zero() {
        let result = read("INSERT INTO amounts (id, amount) VALUES (1, NULL)", "amount").await;

        assert_eq!(result, Ok(Decimal::ZERO));
    }

    #[tokio::test]
    async fn text_is_rejected() {
        let result = read("INSERT INTO amounts (id, label) VALUES (1, 'twelve')", "label").await;

        assert_eq!(
            result,
            Err(RepositoryError::Database(
                "column 'label': unexpected type 'TEXT'".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn missing_column_is_an_error() {
        let result = read("INSERT INTO amounts (id) VALUES (1)", "nope").await;

        assert!(matches!(result, Err(RepositoryError::Database(msg)) if msg.starts_with("column 'nope':")));
    }

    #[test]
    fn decimal_to_f64_keeps_paise() {
        assert_eq!(decimal_to_f64(dec!(85800.25)), 85800.25);
        assert_eq!(decimal_to_f64(Decimal::ZERO), 0.0);
    }
}
