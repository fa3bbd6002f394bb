use super::form_store::FormStore;
use crate::domain::{
    EditRejected, FieldType, FormField, FormSchema, GenerationFailure, NormalizeError,
    SubmissionError, TransportError,
};
use serde_json::{json, Value};

fn schema(names: &[&str]) -> FormSchema {
    FormSchema {
        title: None,
        fields: names
            .iter()
            .map(|n| FormField {
                name: n.to_string(),
                label: n.to_uppercase(),
                field_type: FieldType::Text,
                required: false,
                meta: Value::Null,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_store_starts_empty() {
    let store = FormStore::new();
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.phase, "empty");
    assert!(snapshot.schema.is_none());
    assert!(snapshot.values.is_none());
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_successful_cycle_reaches_ready_with_fresh_values() {
    let store = FormStore::new();
    let token = store.begin_generation().await;
    assert_eq!(store.snapshot().await.phase, "normalizing");

    store
        .complete_generation(token, Ok(schema(&["email"])))
        .await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.phase, "ready");
    assert_eq!(snapshot.schema.unwrap().fields[0].name, "email");
    assert!(snapshot.values.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_cycle_retains_error_detail() {
    let store = FormStore::new();
    let token = store.begin_generation().await;

    let failure = GenerationFailure::Normalization(NormalizeError::Unrecognized {
        raw: json!({ "foo": "bar" }),
    });
    store.complete_generation(token, Err(failure)).await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.phase, "failed");
    let error = snapshot.error.unwrap();
    assert_eq!(error["kind"], "normalization");
    assert_eq!(error["reason"], "unrecognized format");
    assert_eq!(error["raw"], json!({ "foo": "bar" }));
}

#[tokio::test]
async fn test_transport_failure_is_distinguishable() {
    let store = FormStore::new();
    let token = store.begin_generation().await;
    store
        .complete_generation(
            token,
            Err(GenerationFailure::Transport(TransportError::Network(
                "connection refused".to_string(),
            ))),
        )
        .await;

    let error = store.snapshot().await.error.unwrap();
    assert_eq!(error["kind"], "transport");
}

#[tokio::test]
async fn test_begin_generation_clears_prior_state_immediately() {
    let store = FormStore::new();
    let token = store.begin_generation().await;
    store.complete_generation(token, Ok(schema(&["a"]))).await;
    store
        .set_field_value("a", "typed".to_string())
        .await
        .unwrap();

    // New cycle starts; old schema and values must not be shown while
    // the request is outstanding.
    store.begin_generation().await;
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.phase, "normalizing");
    assert!(snapshot.schema.is_none());
    assert!(snapshot.values.is_none());
}

#[tokio::test]
async fn test_stale_completion_is_suppressed() {
    let store = FormStore::new();
    let first = store.begin_generation().await;
    let second = store.begin_generation().await;
    assert_ne!(first, second);

    // The superseded cycle resolves late; it must not leave Normalizing.
    store.complete_generation(first, Ok(schema(&["old"]))).await;
    assert_eq!(store.snapshot().await.phase, "normalizing");

    store.complete_generation(second, Ok(schema(&["new"]))).await;
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.phase, "ready");
    assert_eq!(snapshot.schema.unwrap().fields[0].name, "new");
}

#[tokio::test]
async fn test_stale_completion_cannot_clobber_newer_result() {
    let store = FormStore::new();
    let first = store.begin_generation().await;
    let second = store.begin_generation().await;

    store.complete_generation(second, Ok(schema(&["new"]))).await;
    store.complete_generation(first, Ok(schema(&["old"]))).await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.phase, "ready");
    assert_eq!(snapshot.schema.unwrap().fields[0].name, "new");
}

#[tokio::test]
async fn test_duplicate_completion_with_same_token_is_ignored() {
    let store = FormStore::new();
    let token = store.begin_generation().await;
    store.complete_generation(token, Ok(schema(&["a"]))).await;
    store
        .complete_generation(
            token,
            Err(GenerationFailure::Transport(TransportError::Timeout)),
        )
        .await;

    assert_eq!(store.snapshot().await.phase, "ready");
}

#[tokio::test]
async fn test_set_field_value_updates_exactly_one_key() {
    let store = FormStore::new();
    let token = store.begin_generation().await;
    store
        .complete_generation(token, Ok(schema(&["a", "b"])))
        .await;

    store.set_field_value("a", "1".to_string()).await.unwrap();
    store.set_field_value("b", "2".to_string()).await.unwrap();
    store.set_field_value("a", "3".to_string()).await.unwrap();

    let values = store.snapshot().await.values.unwrap();
    assert_eq!(values.get("a").map(String::as_str), Some("3"));
    assert_eq!(values.get("b").map(String::as_str), Some("2"));
    assert_eq!(values.len(), 2);
}

#[tokio::test]
async fn test_edit_rejected_for_unknown_field() {
    let store = FormStore::new();
    let token = store.begin_generation().await;
    store.complete_generation(token, Ok(schema(&["a"]))).await;

    let err = store
        .set_field_value("nope", "x".to_string())
        .await
        .unwrap_err();
    assert_eq!(err, EditRejected::UnknownField("nope".to_string()));
    assert!(store.snapshot().await.values.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_rejected_outside_ready() {
    let store = FormStore::new();
    let err = store
        .set_field_value("a", "x".to_string())
        .await
        .unwrap_err();
    assert_eq!(err, EditRejected::NotReady);

    store.begin_generation().await;
    let err = store
        .set_field_value("a", "x".to_string())
        .await
        .unwrap_err();
    assert_eq!(err, EditRejected::NotReady);
}

#[tokio::test]
async fn test_submit_requires_active_schema() {
    let store = FormStore::new();
    assert_eq!(
        store.submit().await.unwrap_err(),
        SubmissionError::NoActiveSchema
    );

    store.begin_generation().await;
    assert_eq!(
        store.submit().await.unwrap_err(),
        SubmissionError::NoActiveSchema
    );
}

#[tokio::test]
async fn test_submit_covers_untouched_fields() {
    let store = FormStore::new();
    let token = store.begin_generation().await;
    store
        .complete_generation(token, Ok(schema(&["a", "b", "c"])))
        .await;
    store.set_field_value("b", "hi".to_string()).await.unwrap();

    let payload = store.submit().await.unwrap();
    let keys: Vec<&String> = payload.keys().collect();
    assert_eq!(keys, ["a", "b", "c"]);
    assert_eq!(payload["a"]["value"], "");
    assert_eq!(payload["b"]["value"], "hi");
    assert_eq!(payload["c"]["value"], "");
}

#[tokio::test]
async fn test_values_never_carry_over_between_schemas() {
    let store = FormStore::new();
    let token = store.begin_generation().await;
    store.complete_generation(token, Ok(schema(&["a"]))).await;
    store.set_field_value("a", "old".to_string()).await.unwrap();

    let token = store.begin_generation().await;
    store.complete_generation(token, Ok(schema(&["a"]))).await;

    let values = store.snapshot().await.values.unwrap();
    assert!(values.is_empty());
    let payload = store.submit().await.unwrap();
    assert_eq!(payload["a"]["value"], "");
}
