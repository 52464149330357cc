use memehub_types::RecordId;
use proptest::prelude::*;
use std::collections::HashSet;
use std::str::FromStr;

// ── RecordId ──────────────────────────────────────────────────────

#[test]
fn record_id_new_is_unique() {
    let a = RecordId::new();
    let b = RecordId::new();
    assert_ne!(a, b);
}

#[test]
fn record_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let id = RecordId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), uuid);
}

#[test]
fn record_id_display_and_parse() {
    let id = RecordId::new();
    let parsed = RecordId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn record_id_from_str() {
    let id = RecordId::new();
    let parsed: RecordId = RecordId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn record_id_parse_invalid() {
    assert!(RecordId::parse("not-a-uuid").is_err());
    assert!(RecordId::from_str("").is_err());
}

#[test]
fn record_id_hash_and_eq() {
    let id = RecordId::new();
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    assert_eq!(set.len(), 1);
}

#[test]
fn record_id_serializes_as_plain_string() {
    let id = RecordId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
    let parsed: RecordId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn record_id_into_json_value() {
    let id = RecordId::new();
    let value: serde_json::Value = id.into();
    assert_eq!(value, serde_json::Value::String(id.to_string()));
}

// ── Ordering ──────────────────────────────────────────────────────

#[test]
fn from_millis_orders_by_time_then_sequence() {
    let a = RecordId::from_millis(1_000, 5);
    let b = RecordId::from_millis(1_000, 6);
    let c = RecordId::from_millis(1_001, 0);
    assert!(a < b);
    assert!(b < c);
}

#[test]
fn from_millis_is_a_version_7_uuid() {
    let id = RecordId::from_millis(1_700_000_000_000, 1);
    assert_eq!(id.as_uuid().get_version_num(), 7);
}

proptest! {
    #[test]
    fn string_order_matches_id_order(
        m1 in 0u64..(1 << 47), s1 in 0u64..(1 << 40),
        m2 in 0u64..(1 << 47), s2 in 0u64..(1 << 40),
    ) {
        let a = RecordId::from_millis(m1, s1);
        let b = RecordId::from_millis(m2, s2);
        prop_assert_eq!(a.cmp(&b), a.to_string().cmp(&b.to_string()));
    }
}
