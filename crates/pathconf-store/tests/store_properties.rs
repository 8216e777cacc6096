use pathconf_store::SERVER_DEFAULT_KEY;
use pathconf_test_utils::{setup_store, store_with_base, tree};
use pathconf_tree::{ConfigTree, ConfigValue};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn host_round_trip_through_default() {
    let store = store_with_base(tree(json!({"Servers": {"1": {"host": "localhost"}}})));

    store.set("Servers/1/host", "db.example.com");
    assert_eq!(store.get("Servers/1/host"), Some(ConfigValue::from("db.example.com")));

    store.set("Servers/1/host", "localhost");
    assert_eq!(store.get("Servers/1/host"), None);
    assert_eq!(store.config_data(), ConfigTree::new());
    assert_eq!(store.get_value("Servers/1/host"), Some(ConfigValue::from("localhost")));
}

#[test]
fn dsn_examples() {
    let (store, _) = setup_store();
    store.set("Servers/1/host", "localhost");
    store.set("Servers/1/socket", "/tmp/mysql.sock");
    assert_eq!(store.server_dsn(1), "mysqli:///tmp/mysql.sock");

    store.set("Servers/2/host", "db1");
    store.set("Servers/2/port", 3307);
    store.set("Servers/2/auth_type", "config");
    store.set("Servers/2/user", "root");
    store.set("Servers/2/password", "");
    assert_eq!(store.server_dsn(2), "mysqli://root@db1:3307");
}

#[test]
fn remove_server_keeps_order_and_drops_pointer() {
    let (store, _) = setup_store();
    for (i, host) in ["s1", "s2", "s3", "s4"].iter().enumerate() {
        store.set(&format!("Servers/{}/host", i + 1), *host);
    }
    store.set(SERVER_DEFAULT_KEY, 3);

    store.remove_server(3);

    let hosts: Vec<_> = (1..=3)
        .map(|i| store.get(&format!("Servers/{i}/host")))
        .collect();
    assert_eq!(
        hosts,
        vec![
            Some(ConfigValue::from("s1")),
            Some(ConfigValue::from("s2")),
            Some(ConfigValue::from("s4")),
        ]
    );
    assert_eq!(store.server_count(), 3);
    assert_eq!(store.get(SERVER_DEFAULT_KEY), None);
}

#[test]
fn setup_overlay_stays_minimal() {
    let (store, _) = setup_store();
    store.update_from_tree(&tree(json!({
        "MaxRows": 25,
        "ShowStats": true,
        "DefaultLang": "de",
        "Servers": {"1": {"host": "localhost", "port": ""}}
    })));
    assert_eq!(store.config_data(), tree(json!({"DefaultLang": "de"})));
}

fn setting() -> impl Strategy<Value = (&'static str, ConfigValue)> {
    prop_oneof![
        Just(("MaxRows", ConfigValue::Integer(25))),
        Just(("ShowStats", ConfigValue::Bool(true))),
        Just(("DefaultLang", ConfigValue::from("en"))),
        Just(("Servers/1/host", ConfigValue::from("localhost"))),
        Just(("Servers/2/user", ConfigValue::from("root"))),
    ]
}

proptest! {
    #[test]
    fn prop_non_default_value_is_readable(n in 26i64..10_000, server in 1u32..9) {
        let (store, _) = setup_store();
        let path = format!("Servers/{server}/port");
        store.set(&path, n);
        store.set("MaxRows", n);
        prop_assert_eq!(store.get(&path), Some(ConfigValue::Integer(n)));
        prop_assert_eq!(store.get("MaxRows"), Some(ConfigValue::Integer(n)));
    }

    #[test]
    fn prop_default_collapses_when_base_agrees((path, default) in setting(), n in 1i64..1000) {
        let store = store_with_base(tree(json!({
            "MaxRows": 25,
            "ShowStats": true,
            "DefaultLang": "en",
            "Servers": {"1": {"host": "localhost", "user": "root"}}
        })));
        store.set(path, n);
        store.set(path, default);
        prop_assert_eq!(store.get(path), None);
        prop_assert_eq!(store.config_data(), ConfigTree::new());
    }

    #[test]
    fn prop_filtered_write_leaves_value(before in 26i64..100, after in 100i64..200) {
        let (mut store, _) = setup_store();
        store.set("MaxRows", before);
        store.set_allowed_keys(["ShowStats"]);
        store.set("MaxRows", after);
        prop_assert_eq!(store.get("MaxRows"), Some(ConfigValue::Integer(before)));
    }

    #[test]
    fn prop_remove_server_drops_exactly_one(count in 1u32..7, pick in 0u32..7) {
        let removed = pick % count + 1;
        let (store, _) = setup_store();
        for i in 1..=count {
            store.set(&format!("Servers/{i}/host"), format!("h{i}"));
        }

        store.remove_server(removed);

        let expected: Vec<String> = (1..=count).filter(|i| *i != removed).map(|i| format!("h{i}")).collect();
        let actual: Vec<String> = (1..count)
            .filter_map(|i| store.get(&format!("Servers/{i}/host")))
            .map(|v| v.to_string())
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(store.server_count(), (count - 1) as usize);
    }
}
