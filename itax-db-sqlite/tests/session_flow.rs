//! End-to-end flow against a real SQLite backend: registry lookup, engine
//! computation, persistence, the conversation log and analytics.

use std::collections::HashMap;

use itax_core::db::{DbConfig, RepositoryRegistry};
use itax_core::{
    ConversationMessage, FieldValue, NewSession, ParseMode, Regime, RepositoryError, TaxEngine,
};
use itax_db_sqlite::SqliteRepositoryFactory;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

fn memory_config() -> DbConfig {
    DbConfig {
        backend: "sqlite".to_string(),
        connection_string: ":memory:".to_string(),
    }
}

#[tokio::test]
async fn test_raw_input_is_computed_stored_and_summarised() {
    let repo = registry()
        .create(&memory_config())
        .await
        .expect("sqlite backend should be registered");
    let engine = TaxEngine::new();

    let raw: HashMap<String, FieldValue> = [
        ("gross_salary", FieldValue::from("12,00,000")),
        ("basic_salary", FieldValue::from(dec!(600000))),
        ("hra_received", FieldValue::from("200000")),
        ("rent_paid", FieldValue::from("180000")),
        ("deduction_80c", FieldValue::from("150000")),
        ("deduction_80d", FieldValue::from("25000")),
        ("standard_deduction", FieldValue::from("50000")),
        ("professional_tax", FieldValue::from("2500")),
        ("tds", FieldValue::from("90000")),
        ("selected_regime", FieldValue::from("Old")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let input = itax_core::intake::parse_financial_input(&raw, ParseMode::Strict)
        .expect("complete input should validate");
    let result = engine.compute(&input);
    assert_eq!(result.best_regime, Regime::Old);

    let stored = repo
        .create_session(NewSession::generate(input.clone(), result.clone()))
        .await
        .expect("session should be stored");
    assert_eq!(stored.input, input);
    assert_eq!(stored.result, result);

    repo.append_message(
        stored.session_id,
        &ConversationMessage::question("Do you pay rent in a metro city?"),
    )
    .await
    .expect("question should be logged");

    let messages = repo
        .list_messages(stored.session_id)
        .await
        .expect("messages should load");
    assert_eq!(messages.len(), 1);

    let ids = repo.list_session_ids().await.expect("ids should load");
    assert_eq!(ids, vec![stored.session_id]);

    let analytics = repo.regime_analytics().await.expect("analytics should load");
    assert_eq!(analytics.num_sessions, 1);
    assert_eq!(analytics.old_selected, 1);
    assert_eq!(analytics.new_selected, 0);
    assert_eq!(analytics.avg_tax_old, dec!(69680.00));
    assert_eq!(analytics.avg_tax_new, dec!(85800.00));
}

#[tokio::test]
async fn test_unknown_backend_lists_sqlite() {
    let config = DbConfig {
        backend: "postgres".to_string(),
        connection_string: "postgres://localhost/itax".to_string(),
    };

    let result = registry().create(&config).await;

    match result {
        Err(RepositoryError::Configuration(msg)) => assert!(msg.contains("sqlite")),
        Err(other) => panic!("expected Configuration error, got {other:?}"),
        Ok(_) => panic!("postgres is not registered"),
    }
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("itax-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let config = DbConfig {
        backend: "sqlite".to_string(),
        connection_string: dir.join("sessions.db").display().to_string(),
    };

    let input = itax_core::FinancialInput {
        gross_salary: dec!(800000),
        standard_deduction: dec!(50000),
        ..Default::default()
    };
    let result = TaxEngine::new().compute(&input);
    let session = NewSession::generate(input, result);
    let id = session.session_id;

    {
        let repo = registry().create(&config).await.expect("should open file db");
        repo.create_session(session).await.expect("should store session");
    }

    let reopened = registry().create(&config).await.expect("should reopen file db");
    let fetched = reopened.get_session(id).await.expect("session should persist");
    assert_eq!(fetched.session_id, id);
    assert_eq!(fetched.input.gross_salary, dec!(800000));

    let _ = std::fs::remove_dir_all(&dir);
}
