//! # Ticket Store Service Tests

use super::*;
use crate::domain::config::TicketColumns;
use crate::domain::errors::PersistenceError;
use shared_types::{
    AuthenticationProfile, InMemoryKVStore, Principal, SchemaError, TicketBuilder,
};

fn make_store() -> TicketStore<InMemoryKVStore> {
    TicketStore::with_defaults(Arc::new(InMemoryKVStore::new()), TicketStoreConfig::default())
}

fn make_ticket(id: &str, expiration_time: u64) -> Ticket {
    let mut ticket = TicketBuilder::new(Principal {
        uid: "alice".into(),
        organization: Some("example.org".into()),
    })
    .authentication_profile(AuthenticationProfile {
        id: "password".into(),
        level: 10,
        methods: vec!["pwd".into()],
    })
    .authentication_profile_id("otp")
    .requestor("rp-a")
    .requestor("rp-b")
    .remote_idp("https://idp.example.org")
    .build();
    ticket
        .attributes_mut()
        .put("saml", "name_id", &"alice@example.org")
        .unwrap();
    ticket
        .assign_identity(TicketId::from(id), 100, expiration_time)
        .unwrap();
    ticket
}

fn insert_committed(store: &TicketStore<InMemoryKVStore>, ticket: &Ticket) {
    let mut tx = StoreTransaction::begin(&**store.kv());
    store.insert(&mut tx, ticket).unwrap();
    tx.commit().unwrap();
}

#[test]
fn test_insert_and_retrieve_every_field() {
    let store = make_store();
    let ticket = make_ticket("t1", 1_900);
    insert_committed(&store, &ticket);

    let loaded = store.retrieve(&TicketId::from("t1")).unwrap().unwrap();
    assert_eq!(loaded, ticket);
    assert_eq!(
        loaded.attributes().get::<String>("saml", "name_id").unwrap(),
        Some("alice@example.org".to_string())
    );
    assert!(store.exists(&TicketId::from("t1")).unwrap());
}

#[test]
fn test_retrieve_absent_is_none() {
    let store = make_store();
    assert_eq!(store.retrieve(&TicketId::from("missing")).unwrap(), None);
    assert!(!store.exists(&TicketId::from("missing")).unwrap());
}

#[test]
fn test_unavailable_is_not_not_found() {
    let store = make_store();
    insert_committed(&store, &make_ticket("t1", 1_900));
    store.kv().set_unavailable(true);

    assert!(matches!(
        store.retrieve(&TicketId::from("t1")),
        Err(RetrievalError::Unavailable { .. })
    ));
    assert!(matches!(
        store.exists(&TicketId::from("t1")),
        Err(RetrievalError::Unavailable { .. })
    ));
}

#[test]
fn test_malformed_row_is_reported() {
    let store = make_store();
    let id = TicketId::from("t1");
    store.kv().put(&store.row_key(&id), &[0xFF, 0x01]).unwrap();

    assert!(matches!(
        store.retrieve(&id),
        Err(RetrievalError::Malformed { .. })
    ));
    // Presence does not need a decode.
    assert!(store.exists(&id).unwrap());
}

#[test]
fn test_insert_duplicate_fails() {
    let store = make_store();
    let ticket = make_ticket("t1", 1_900);
    insert_committed(&store, &ticket);

    let mut tx = StoreTransaction::begin(&**store.kv());
    let err = store.insert(&mut tx, &ticket).unwrap_err();
    assert!(matches!(err, PersistenceError::Insert { .. }));
}

#[test]
fn test_insert_unidentified_fails() {
    let store = make_store();
    let ticket = TicketBuilder::new(Principal::new("bob")).build();

    let mut tx = StoreTransaction::begin(&**store.kv());
    assert_eq!(
        store.insert(&mut tx, &ticket),
        Err(PersistenceError::Unidentified)
    );
}

#[test]
fn test_update_missing_row_fails() {
    let store = make_store();
    let ticket = make_ticket("t1", 1_900);

    let mut tx = StoreTransaction::begin(&**store.kv());
    let err = store.update(&mut tx, &ticket).unwrap_err();
    assert!(matches!(err, PersistenceError::Update { .. }));
}

#[test]
fn test_update_replaces_row() {
    let store = make_store();
    let mut ticket = make_ticket("t1", 1_900);
    insert_committed(&store, &ticket);

    ticket.detach_requestor("rp-a");
    ticket.renew(3_700);

    let mut tx = StoreTransaction::begin(&**store.kv());
    store.update(&mut tx, &ticket).unwrap();
    tx.commit().unwrap();

    let loaded = store.retrieve(&TicketId::from("t1")).unwrap().unwrap();
    assert_eq!(loaded.requestor_ids(), ["rp-b"]);
    assert_eq!(loaded.expiration_time(), 3_700);
}

#[test]
fn test_remove_missing_row_fails() {
    let store = make_store();
    let mut tx = StoreTransaction::begin(&**store.kv());
    let err = store.remove(&mut tx, &TicketId::from("nope")).unwrap_err();
    assert!(matches!(err, PersistenceError::Remove { .. }));
}

#[test]
fn test_staged_writes_are_invisible_until_commit() {
    let store = make_store();
    let ticket = make_ticket("t1", 1_900);

    let mut tx = StoreTransaction::begin(&**store.kv());
    store.insert(&mut tx, &ticket).unwrap();
    assert!(store.exists_in(&tx, &TicketId::from("t1")).unwrap());
    assert!(!store.exists(&TicketId::from("t1")).unwrap());

    tx.rollback();
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_count_tracks_rows() {
    let store = make_store();
    for i in 0..5 {
        insert_committed(&store, &make_ticket(&format!("t{i}"), 1_900));
    }
    assert_eq!(store.count().unwrap(), 5);

    let mut tx = StoreTransaction::begin(&**store.kv());
    store.remove(&mut tx, &TicketId::from("t3")).unwrap();
    tx.commit().unwrap();
    assert_eq!(store.count().unwrap(), 4);
}

#[test]
fn test_expiry_scan_boundary() {
    let store = make_store();
    insert_committed(&store, &make_ticket("early", 1_000));
    insert_committed(&store, &make_ticket("boundary", 2_000));
    insert_committed(&store, &make_ticket("late", 2_001));

    let mut tx = StoreTransaction::begin(&**store.kv());
    let mut removed: Vec<TicketId> = store
        .scan_expired(&tx, 2_000)
        .unwrap()
        .into_iter()
        .map(|expired| expired.id)
        .collect();
    removed.sort();
    assert_eq!(
        removed,
        vec![TicketId::from("boundary"), TicketId::from("early")]
    );
    store.remove_ids(&mut tx, &removed);
    tx.commit().unwrap();

    assert_eq!(store.count().unwrap(), 1);
    assert!(store.exists(&TicketId::from("late")).unwrap());
}

#[test]
fn test_remove_ids_deletes_only_the_scanned_rows() {
    let store = make_store();
    insert_committed(&store, &make_ticket("early", 1_000));

    let mut tx = StoreTransaction::begin(&**store.kv());
    let scanned: Vec<TicketId> = store
        .scan_expired(&tx, 2_000)
        .unwrap()
        .into_iter()
        .map(|expired| expired.id)
        .collect();
    // Becomes due between the scan and the delete.
    store.insert(&mut tx, &make_ticket("late", 1_500)).unwrap();
    store.remove_ids(&mut tx, &scanned);
    tx.commit().unwrap();

    assert!(!store.exists(&TicketId::from("early")).unwrap());
    assert!(store.exists(&TicketId::from("late")).unwrap());
}

#[test]
fn test_expiry_scan_keeps_damaged_payload() {
    let store = make_store();
    let ticket = make_ticket("t1", 1_000);
    insert_committed(&store, &ticket);

    // Damage the attribute column only; expiration stays readable.
    let key = store.row_key(&TicketId::from("t1"));
    let mut row: std::collections::BTreeMap<String, Vec<u8>> =
        bincode::deserialize(&store.kv().get(&key).unwrap().unwrap()).unwrap();
    row.insert("attributes".into(), b"{not json".to_vec());
    store
        .kv()
        .put(&key, &bincode::serialize(&row).unwrap())
        .unwrap();

    let tx = StoreTransaction::begin(&**store.kv());
    let expired = store.scan_expired(&tx, 5_000).unwrap();
    assert_eq!(expired.len(), 1);
    assert!(expired[0].ticket.is_err());

    let fallback = expired[0].best_available();
    assert_eq!(fallback.id(), Some(&TicketId::from("t1")));
    assert_eq!(fallback.expiration_time(), 1_000);
}

#[test]
fn test_column_override_changes_layout() {
    let kv = Arc::new(InMemoryKVStore::new());
    let config = TicketStoreConfig {
        table: "sessions".into(),
        columns: TicketColumns {
            expiration_time: "exp".into(),
            ..TicketColumns::default()
        },
        validation_probe: None,
    };
    let store = TicketStore::with_defaults(kv.clone(), config);
    insert_committed(&store, &make_ticket("t1", 1_900));

    let row: std::collections::BTreeMap<String, Vec<u8>> = bincode::deserialize(
        &kv.get(&key::compose(&["sessions", "row", "t1"]))
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert!(row.contains_key("exp"));
    assert!(!row.contains_key("expiration_time"));

    // A store reading with default names sees a malformed row.
    let default_names = TicketStore::with_defaults(
        kv,
        TicketStoreConfig {
            table: "sessions".into(),
            ..TicketStoreConfig::default()
        },
    );
    assert!(matches!(
        default_names.retrieve(&TicketId::from("t1")),
        Err(RetrievalError::Malformed { .. })
    ));
}

#[test]
fn test_validate_after_provision() {
    let store = make_store();
    assert!(matches!(
        store.validate(),
        Err(TicketStoreError::Schema(SchemaError::MissingTable { .. }))
    ));

    store
        .config()
        .schema()
        .provision(&**store.kv())
        .unwrap();
    store.validate().unwrap();
}

#[test]
fn test_validate_with_override_probe() {
    let kv = Arc::new(InMemoryKVStore::new());
    let config = TicketStoreConfig {
        validation_probe: Some("tgt:expiration_time,legacy_flags".into()),
        ..TicketStoreConfig::default()
    };
    let store = TicketStore::with_defaults(kv, config);
    store
        .config()
        .schema()
        .provision(&**store.kv())
        .unwrap();

    assert!(matches!(
        store.validate(),
        Err(TicketStoreError::Schema(SchemaError::MissingColumn { .. }))
    ));
}
