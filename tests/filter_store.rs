use filter_sheet::filters::{FilterStore, DEFAULT_NAMESPACE};
use filter_sheet::storage::{KeyValueStorage, MemoryStorage};
use filter_sheet::{FilterEntry, FilterSheetError, FilterValue};

fn applied_names(store: &FilterStore<MemoryStorage>) -> Vec<String> {
    store
        .applied_filters()
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

#[test]
fn single_text_filter_is_applied_and_queried() {
    let mut store = FilterStore::new(MemoryStorage::default());
    store.set_value("status", "active");

    assert_eq!(
        store.applied_filters(),
        vec![("status".to_string(), FilterValue::from("active"))]
    );
    assert_eq!(store.query_string(), "status=active");
}

#[test]
fn list_values_repeat_the_key() {
    let mut store = FilterStore::new(MemoryStorage::default());
    store.set_value("tags", vec!["a", "b"]);

    assert_eq!(store.query_string(), "tags=a&tags=b");
}

#[test]
fn nan_values_are_not_applied() {
    let mut store = FilterStore::new(MemoryStorage::default());
    store.set_value("count", f64::NAN);

    assert!(store.applied_filters().is_empty());
    assert!(store.get("count").is_some());
}

#[test]
fn removing_unknown_filter_is_a_no_op() {
    let mut store = FilterStore::new(MemoryStorage::default());
    store.remove_filter("missing-name");

    assert!(store.is_empty());
}

#[test]
fn malformed_persisted_blob_starts_empty() {
    let storage = MemoryStorage::with_blob("orders", "{not json");
    let store = FilterStore::with_namespace(storage, "orders");

    assert!(store.is_empty());
    assert!(store.is_persistent());
}

#[test]
fn wrong_shape_blob_starts_empty() {
    let storage = MemoryStorage::with_blob(DEFAULT_NAMESPACE, "[1, 2, 3]");
    let store = FilterStore::new(storage);

    assert!(store.is_empty());
}

#[test]
fn empty_store_has_empty_query_string() {
    let mut store = FilterStore::new(MemoryStorage::default());
    assert_eq!(store.query_string(), "");

    store.set_value("q", "");
    store.set_value("tags", Vec::<String>::new());
    store.set_value("owner", FilterValue::Null);
    assert_eq!(store.query_string(), "");
}

#[test]
fn applied_set_follows_last_write_per_name() {
    let mut store = FilterStore::new(MemoryStorage::default());

    store.set_value("a", "1");
    store.set_value("b", "");
    store.set_value("c", vec!["x"]);
    store.set_value("a", "");
    store.set_value("b", "2");
    store.remove_filter("c");
    store.set_value("d", 0_i64);
    store.set_value("c", vec!["y"]);

    assert_eq!(applied_names(&store), vec!["b", "d", "c"]);
    assert_eq!(store.query_string(), "b=2&d=0&c=y");
}

#[test]
fn clear_is_idempotent() {
    let storage = MemoryStorage::default();
    let mut store = FilterStore::new(storage.clone());
    store.set_value("status", "active");

    store.clear_filters();
    let once = storage.get(DEFAULT_NAMESPACE).unwrap();
    store.clear_filters();
    let twice = storage.get(DEFAULT_NAMESPACE).unwrap();

    assert!(store.is_empty());
    assert_eq!(once.as_deref(), Some("{}"));
    assert_eq!(once, twice);
}

#[test]
fn persisted_mapping_round_trips() {
    let storage = MemoryStorage::default();
    let mut store = FilterStore::new(storage.clone());

    store.set_value("status", "active");
    store.set_value("tags", vec!["a", "b"]);
    store.set_value("count", 3_i64);
    store.set_value("archived", false);
    store.set_entry(
        "tenant",
        FilterEntry {
            value: FilterValue::from("acme"),
            is_hidden: true,
            applied_internally: true,
        },
    );

    let reopened = FilterStore::new(storage);
    assert_eq!(reopened.filters(), store.filters());
    assert_eq!(reopened.query_string(), store.query_string());
}

#[test]
fn persisted_layout_matches_entry_shape() {
    let storage = MemoryStorage::default();
    let mut store = FilterStore::new(storage.clone());
    store.set_value("status", "active");

    let raw = storage.get(DEFAULT_NAMESPACE).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "status": { "value": "active", "isHidden": false, "appliedInternally": false }
        })
    );
}

#[test]
fn namespaces_are_independent() {
    let storage = MemoryStorage::default();
    let mut orders = FilterStore::with_namespace(storage.clone(), "orders");
    let mut users = FilterStore::with_namespace(storage.clone(), "users");

    orders.set_value("status", "open");
    users.set_value("role", "admin");
    orders.clear_filters();

    let users_again = FilterStore::with_namespace(storage, "users");
    assert_eq!(users_again.query_string(), "role=admin");
}

/// Storage that accepts reads and rejects every write.
#[derive(Debug, Default)]
struct ReadOnlyStorage {
    attempts: usize,
}

impl KeyValueStorage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> filter_sheet::Result<Option<String>> {
        Ok(Some(r#"{"status":{"value":"active"}}"#.to_string()))
    }

    fn set(&mut self, _key: &str, _text: &str) -> filter_sheet::Result<()> {
        self.attempts += 1;
        Err(FilterSheetError::Storage("quota exceeded".to_string()))
    }

    fn remove(&mut self, _key: &str) -> filter_sheet::Result<()> {
        Err(FilterSheetError::Storage("quota exceeded".to_string()))
    }
}

#[test]
fn failed_writes_degrade_to_memory() {
    let mut store = FilterStore::new(ReadOnlyStorage::default());
    assert_eq!(store.query_string(), "status=active");

    store.set_value("tags", vec!["a"]);
    assert!(!store.is_persistent());
    assert_eq!(store.query_string(), "status=active&tags=a");

    store.remove_filter("status");
    store.clear_filters();
    assert!(store.is_empty());
    assert_eq!(store.storage().attempts, 1);
}

/// Storage whose reads fail outright.
struct UnavailableStorage;

impl KeyValueStorage for UnavailableStorage {
    fn get(&self, _key: &str) -> filter_sheet::Result<Option<String>> {
        Err(FilterSheetError::Storage("storage disabled".to_string()))
    }

    fn set(&mut self, _key: &str, _text: &str) -> filter_sheet::Result<()> {
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> filter_sheet::Result<()> {
        Ok(())
    }
}

#[test]
fn unreadable_storage_starts_empty() {
    let mut store = FilterStore::new(UnavailableStorage);
    assert!(store.is_empty());

    store.set_value("q", "x");
    assert_eq!(store.query_string(), "q=x");
}
