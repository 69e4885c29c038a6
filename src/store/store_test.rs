use super::memory::MemoryStore;
use super::mongo::{from_storage_document, to_storage_document};
use super::*;
use crate::model::{Alert, Receiver};
use chrono::{TimeZone, Utc};
use mongodb::bson::{doc, Bson};

fn sample_alert() -> Alert {
    let at = Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap();
    Alert {
        id: "ignored-by-store".to_string(),
        name: "high-cpu".to_string(),
        created: at,
        expression: "cpu > 0.9".to_string(),
        duration: "5m".to_string(),
        label: [("severity".to_string(), "page".to_string())]
            .into_iter()
            .collect(),
        last_updated: at,
        summary: "CPU is hot".to_string(),
        description: "CPU above 90% for 5 minutes".to_string(),
        runbook: "https://runbooks.example/cpu".to_string(),
    }
}

#[test]
fn test_parse_id_accepts_object_id_hex() {
    let id = ObjectId::new();

    assert_eq!(parse_id(&id.to_hex()), Some(id));
}

#[test]
fn test_parse_id_rejects_malformed_input() {
    assert_eq!(parse_id(""), None);
    assert_eq!(parse_id("not-an-id"), None);
    // 23 and 25 characters
    assert_eq!(parse_id("65e1c3a0f1d2c3b4a596877"), None);
    assert_eq!(parse_id("65e1c3a0f1d2c3b4a59687780"), None);
    // right length, not hex
    assert_eq!(parse_id("zzzzzzzzzzzzzzzzzzzzzzzz"), None);
}

#[test]
fn test_storage_document_moves_id_into_object_id() {
    let id = ObjectId::new();
    let alert = sample_alert();

    let document = to_storage_document(&id, &alert).unwrap();

    assert_eq!(document.get("_id"), Some(&Bson::ObjectId(id)));
    assert!(document.get("id").is_none(), "wire id must not be stored");
    assert_eq!(document.get_str("name").unwrap(), "high-cpu");
    assert_eq!(document.get_str("duration").unwrap(), "5m");
    assert!(document.get("lastUpdated").is_some());
    assert_eq!(
        document.get_document("label").unwrap().get_str("severity").unwrap(),
        "page"
    );
}

#[test]
fn test_storage_document_decodes_back_to_record() {
    let id = ObjectId::new();
    let alert = sample_alert();

    let document = to_storage_document(&id, &alert).unwrap();
    let decoded: Alert = from_storage_document(document).unwrap();

    assert_eq!(decoded.id, id.to_hex());
    assert_eq!(decoded.name, alert.name);
    assert_eq!(decoded.created, alert.created);
    assert_eq!(decoded.label, alert.label);
    assert_eq!(decoded.runbook, alert.runbook);
}

#[test]
fn test_storage_document_without_object_id_is_rejected() {
    let document = doc! { "_id": "plain-string", "email": "ops@example.com" };

    let result = from_storage_document::<Receiver>(document);

    assert!(matches!(result, Err(StoreError::MissingId)));
}

#[test]
fn test_storage_document_with_missing_fields_uses_defaults() {
    let id = ObjectId::new();
    let document = doc! { "_id": id, "email": "ops@example.com" };

    let receiver: Receiver = from_storage_document(document).unwrap();

    assert_eq!(receiver.id, id.to_hex());
    assert_eq!(receiver.email, "ops@example.com");
    assert!(receiver.label.is_empty());
}

#[tokio::test]
async fn test_memory_store_crud_cycle() {
    let store = MemoryStore::<Receiver>::new();
    let id = ObjectId::new();
    let receiver = Receiver {
        email: "a@example.com".to_string(),
        ..Default::default()
    };

    store.insert(&id, &receiver).await.unwrap();
    let found = store.find_by_id(&id).await.unwrap().expect("inserted record");
    assert_eq!(found.id, id.to_hex());

    let replacement = Receiver {
        email: "b@example.com".to_string(),
        ..Default::default()
    };
    assert!(store.replace(&id, &replacement).await.unwrap());
    let found = store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(found.email, "b@example.com");
    assert_eq!(found.id, id.to_hex());

    assert!(store.delete(&id).await.unwrap());
    assert!(store.find_by_id(&id).await.unwrap().is_none());
    assert!(!store.delete(&id).await.unwrap());
    assert!(!store.replace(&id, &replacement).await.unwrap());
}

#[tokio::test]
async fn test_memory_store_failing_mode() {
    let store = MemoryStore::<Alert>::new();
    store.set_failing(true);

    let result = store.find_all().await;

    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}
