use filter_sheet::app::FilterChip;
use filter_sheet::{initialize, Action, Config, Event, FilterSheetError, FilterValue};
use std::path::Path;
use tempfile::TempDir;

const FILTERS_TOML: &str = r##"
[[filters]]
type = "select"
name = "status"
label = "Status"
options = [
    { label = "Active", value = "active" },
    { label = "Archived", value = "archived" },
]

[[filters]]
type = "checkbox"
name = "tags"
label = "Tags"
options = [
    { label = "Red", value = "red" },
    { label = "Blue", value = "blue" },
]

[[filters]]
type = "date"
name = "created_after"
label = "Created after"
placeholder = "YYYY-MM-DD"

[[filters]]
type = "number"
name = "tenant"
label = "Tenant"
is_hidden = true
default_value = 4
"##;

fn config_in(dir: &Path) -> Config {
    let filters_file = dir.join("filters.toml");
    std::fs::write(&filters_file, FILTERS_TOML).unwrap();

    Config {
        namespace: "orders".to_string(),
        data_dir: dir.join("data"),
        filters_file: Some(filters_file),
        trace_level: None,
    }
}

fn set(name: &str, value: impl Into<FilterValue>) -> Event {
    Event::SetField {
        name: name.to_string(),
        value: value.into(),
    }
}

fn read_storage(config: &Config) -> String {
    std::fs::read_to_string(config.storage_path()).unwrap_or_default()
}

#[test]
fn applied_filters_survive_a_new_session() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());

    {
        let mut session = initialize(&config).unwrap();
        session.handle(&Event::Open);
        session.handle(&set("status", "active"));
        session.handle(&set("tags", vec!["red"]));
        let (render, actions) = session.handle(&Event::Apply);

        assert!(render);
        assert!(matches!(
            actions.as_slice(),
            [Action::Applied { query, .. }] if query == "status=active&tags=red&tenant=4"
        ));
        assert!(!session.viewmodel().is_open);
    }

    let session = initialize(&config).unwrap();
    assert_eq!(session.store.query_string(), "status=active&tags=red&tenant=4");

    let view = session.viewmodel();
    assert_eq!(view.applied_count, 2);
    assert_eq!(
        view.chips,
        vec![
            FilterChip {
                name: "status".to_string(),
                label: "Status".to_string(),
                value_label: "Active".to_string(),
            },
            FilterChip {
                name: "tags".to_string(),
                label: "Tags".to_string(),
                value_label: "Red".to_string(),
            },
        ]
    );
}

#[test]
fn rejected_apply_leaves_storage_untouched() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let mut session = initialize(&config).unwrap();

    session.handle(&Event::Open);
    session.handle(&set("status", "active"));
    session.handle(&Event::Apply);
    let before = read_storage(&config);

    session.handle(&Event::Open);
    session.handle(&set("status", "archived"));
    session.handle(&set("created_after", "yesterday"));
    let (render, actions) = session.handle(&Event::Apply);

    assert!(render);
    assert!(actions.is_empty());
    assert_eq!(read_storage(&config), before);

    let view = session.viewmodel();
    assert!(view.is_open);
    let field = view
        .fields
        .iter()
        .find(|field| field.name == "created_after")
        .unwrap();
    assert_eq!(field.error.as_deref(), Some("Must be a date (YYYY-MM-DD)"));
    assert!(view.fields.iter().all(|field| field.name != "tenant"));

    session.handle(&set("created_after", "2024-05-01"));
    assert_eq!(session.viewmodel().fields[2].error, None);

    let (_, actions) = session.handle(&Event::Apply);
    assert!(matches!(
        actions.as_slice(),
        [Action::Applied { query, .. }]
            if query == "status=archived&tenant=4&created_after=2024-05-01"
    ));
}

#[test]
fn cancel_discards_edits() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let mut session = initialize(&config).unwrap();

    session.handle(&Event::Open);
    session.handle(&set("status", "active"));
    let (_, actions) = session.handle(&Event::Cancel);

    assert_eq!(actions, vec![Action::Closed]);
    assert_eq!(session.store.query_string(), "");
    assert!(read_storage(&config).is_empty());
}

#[test]
fn chip_removal_while_closed_updates_query() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let mut session = initialize(&config).unwrap();

    session.handle(&Event::Open);
    session.handle(&set("status", "active"));
    session.handle(&set("tags", vec!["red", "blue"]));
    session.handle(&Event::Apply);

    let (render, actions) = session.handle(&Event::RemoveFilter {
        name: "status".to_string(),
    });

    assert!(render);
    assert_eq!(
        actions,
        vec![Action::FilterRemoved {
            name: "status".to_string(),
            query: "tags=red&tags=blue&tenant=4".to_string(),
        }]
    );
    assert_eq!(session.viewmodel().chips[0].value_label, "Red, Blue");
}

#[test]
fn clear_keeps_sheet_open_with_blank_inputs() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let mut session = initialize(&config).unwrap();

    session.handle(&Event::Open);
    session.handle(&set("status", "active"));
    session.handle(&Event::Apply);

    session.handle(&Event::Open);
    let (_, actions) = session.handle(&Event::Clear);
    assert_eq!(
        actions,
        vec![Action::Cleared {
            query: String::new()
        }]
    );

    let view = session.viewmodel();
    assert!(view.is_open);
    assert_eq!(view.applied_count, 0);
    let status = view.fields.iter().find(|field| field.name == "status").unwrap();
    assert_eq!(status.value, FilterValue::from(""));
    let tags = view.fields.iter().find(|field| field.name == "tags").unwrap();
    assert_eq!(tags.value, FilterValue::List(vec![]));

    let (_, again) = session.handle(&Event::Clear);
    assert_eq!(again, actions);
}

#[test]
fn namespaces_share_one_storage_file() {
    let dir = TempDir::new().unwrap();
    let orders = config_in(dir.path());
    let users = Config {
        namespace: "users".to_string(),
        ..orders.clone()
    };

    {
        let mut session = initialize(&orders).unwrap();
        session.store.set_value("status", "active");
    }
    {
        let mut session = initialize(&users).unwrap();
        assert!(session.store.is_empty());
        session.store.set_value("status", "archived");
    }

    let session = initialize(&orders).unwrap();
    assert_eq!(session.store.query_string(), "status=active");
}

#[test]
fn malformed_storage_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(config.storage_path(), "not json at all").unwrap();

    let session = initialize(&config).unwrap();
    assert!(session.store.is_empty());
}

#[test]
fn concurrent_namespaces_keep_their_filters() {
    let dir = TempDir::new().unwrap();
    let orders = config_in(dir.path());
    let users = Config {
        namespace: "users".to_string(),
        ..orders.clone()
    };

    {
        let mut orders_session = initialize(&orders).unwrap();
        let mut users_session = initialize(&users).unwrap();

        orders_session.store.set_value("status", "active");
        users_session.store.set_value("role", "admin");
        orders_session.store.set_value("tags", vec!["red"]);
    }

    assert_eq!(
        initialize(&orders).unwrap().store.query_string(),
        "status=active&tags=red"
    );
    assert_eq!(initialize(&users).unwrap().store.query_string(), "role=admin");
}

#[test]
fn non_utf8_storage_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(config.storage_path(), [0xff, 0xfe, 0x00, 0x7b]).unwrap();

    let mut session = initialize(&config).unwrap();
    assert!(session.store.is_empty());

    session.store.set_value("status", "active");
    assert!(session.store.is_persistent());
    drop(session);

    assert_eq!(
        initialize(&config).unwrap().store.query_string(),
        "status=active"
    );
}

#[test]
fn unusable_data_dir_runs_in_memory() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    std::fs::write(&config.data_dir, "a regular file").unwrap();

    let mut session = initialize(&config).unwrap();
    assert!(session.store.is_persistent());

    session.handle(&Event::Open);
    session.handle(&set("status", "active"));
    let (_, actions) = session.handle(&Event::Apply);

    assert!(matches!(
        actions.as_slice(),
        [Action::Applied { query, .. }] if query == "status=active&tenant=4"
    ));
    assert!(!session.store.is_persistent());
    assert_eq!(session.viewmodel().applied_count, 1);
}

#[test]
fn missing_filters_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        filters_file: Some(dir.path().join("absent.toml")),
        ..Config::default()
    };

    assert!(matches!(initialize(&config), Err(FilterSheetError::Io(_))));
}

#[test]
fn invalid_filters_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let filters_file = dir.path().join("filters.toml");
    std::fs::write(&filters_file, "[[filters]]\nname = \"q\"\n").unwrap();

    let config = Config {
        data_dir: dir.path().to_path_buf(),
        filters_file: Some(filters_file),
        ..Config::default()
    };

    assert!(matches!(
        initialize(&config),
        Err(FilterSheetError::Config(_))
    ));
}

#[test]
fn query_string_seeds_internal_filters() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let mut session = initialize(&config).unwrap();

    let count = session
        .store
        .apply_query("?status=active&tags=red&tags=blue&tenant=7", &session.sheet.config);
    assert_eq!(count, 3);
    assert_eq!(
        session.store.get("tenant").map(|entry| &entry.value),
        Some(&FilterValue::Number(7.0))
    );
    assert!(session.store.get("status").unwrap().applied_internally);

    session.handle(&Event::Open);
    let view = session.viewmodel();
    let tags = view.fields.iter().find(|field| field.name == "tags").unwrap();
    assert_eq!(tags.value, FilterValue::from(vec!["red", "blue"]));
}
