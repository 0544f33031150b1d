use serde_json::json;
use webprefs::error::PrefsError;
use webprefs::field::{FieldKind, Value};
use webprefs::folders::FolderSpec;
use webprefs::patch::PatchReader;
use webprefs::sentinel::Limit;

#[test]
fn falsy_values_are_present() {
    let patch = PatchReader::parse(r#"{"dht": false, "listen_port": 0, "temp_path": ""}"#).expect("parse ok");
    assert!(patch.has("dht"));
    assert_eq!(patch.bool("dht").unwrap(), Some(false));
    assert_eq!(patch.int("listen_port").unwrap(), Some(0));
    assert_eq!(patch.text("temp_path").unwrap(), Some(String::new()));
    assert!(!patch.has("pex"));
    assert_eq!(patch.bool("pex").unwrap(), None, "absent keys never get a value");
}

#[test]
fn empty_object_is_an_empty_patch() {
    let patch = PatchReader::parse("{}").expect("parse ok");
    assert!(patch.is_empty());
    assert_eq!(patch.keys().count(), 0);
}

#[test]
fn non_object_documents_are_malformed() {
    for raw in ["[1, 2]", "\"dht\"", "42", "null", "{\"dht\": tru", ""] {
        let err = PatchReader::parse(raw).expect_err(raw);
        assert!(matches!(err, PrefsError::MalformedPatch(_)), "{raw} gave {err}");
        assert!(err.is_rejection());
    }
}

#[test]
fn numbers_coerce_from_strings_but_not_from_bools() {
    let patch = PatchReader::from_value(json!({
        "a": "42", "b": 7.0, "c": 1.5, "d": true, "e": " 0.25 ", "f": "NaN"
    }))
    .unwrap();
    assert_eq!(patch.int("a").unwrap(), Some(42));
    assert_eq!(patch.int("b").unwrap(), Some(7), "integral reals are integers");
    assert!(patch.int("c").is_err(), "fractions are not integers");
    assert!(patch.int("d").is_err());
    assert_eq!(patch.real("e").unwrap(), Some(0.25));
    assert!(patch.real("f").is_err(), "non finite numbers are refused");
    assert_eq!(patch.real("b").unwrap(), Some(7.0));
}

#[test]
fn mismatch_names_the_key_and_kind() {
    let patch = PatchReader::parse(r#"{"dht": "yes"}"#).unwrap();
    match patch.bool("dht") {
        Err(PrefsError::TypeMismatch { key, expected }) => {
            assert_eq!(key, "dht");
            assert_eq!(expected, "a boolean");
        }
        other => panic!("expected a type mismatch, got {:?}", other),
    }
}

#[test]
fn choices_are_range_checked() {
    let patch = PatchReader::parse(r#"{"encryption": 2, "proxy_type": 6, "dyndns_service": -1}"#).unwrap();
    assert_eq!(patch.choice("encryption", 3).unwrap(), Some(2));
    assert!(patch.choice("proxy_type", 6).is_err());
    assert!(patch.choice("dyndns_service", 2).is_err());
    assert_eq!(
        patch.value("encryption", FieldKind::Choice(3)).unwrap(),
        Some(Value::Int(2))
    );
}

#[test]
fn text_lists_split_and_drop_empty_entries() {
    let patch = PatchReader::from_value(json!({
        "banned_IPs": "1.1.1.1\n\n 2.2.2.2 \n",
        "as_array": ["a", "", "b"],
        "bad": ["a", 1]
    }))
    .unwrap();
    assert_eq!(
        patch.text_list("banned_IPs", "\n").unwrap(),
        Some(vec!["1.1.1.1".to_string(), "2.2.2.2".to_string()])
    );
    assert_eq!(
        patch.text_list("as_array", "\n").unwrap(),
        Some(vec!["a".to_string(), "b".to_string()])
    );
    assert!(patch.text_list("bad", "\n").is_err());
}

#[test]
fn folders_accept_both_representations() {
    let patch = PatchReader::parse(
        r#"{"scan_dirs": {"/watch/a": 0, "/watch/b": 1, "/watch/c": "/downloads/c"}}"#,
    )
    .unwrap();
    let folders = patch.folders("scan_dirs").unwrap().expect("present");
    assert_eq!(
        folders,
        vec![
            ("/watch/a".to_string(), FolderSpec::Watched),
            ("/watch/b".to_string(), FolderSpec::Default),
            ("/watch/c".to_string(), FolderSpec::Custom("/downloads/c".into())),
        ]
    );
}

#[test]
fn folder_entries_of_the_wrong_shape_are_mismatches() {
    for raw in [
        r#"{"scan_dirs": {"/watch/a": 2}}"#,
        r#"{"scan_dirs": {"/watch/a": true}}"#,
        r#"{"scan_dirs": {"/watch/a": ""}}"#,
    ] {
        let patch = PatchReader::parse(raw).unwrap();
        match patch.folders("scan_dirs") {
            Err(PrefsError::TypeMismatch { key, .. }) => assert_eq!(key, "scan_dirs./watch/a"),
            other => panic!("{raw}: expected a type mismatch, got {:?}", other),
        }
    }
    let patch = PatchReader::parse(r#"{"scan_dirs": ["/watch/a"]}"#).unwrap();
    assert!(patch.folders("scan_dirs").is_err());
}

#[test]
fn limits_decode_any_negative_as_disabled() {
    assert_eq!(Limit::decode(-1.0), Limit::<f64>::Disabled);
    assert_eq!(Limit::decode(-0.5), Limit::<f64>::Disabled);
    assert_eq!(Limit::decode(-42i64), Limit::<i64>::Disabled);
    assert_eq!(Limit::decode(0.0), Limit::Enabled(0.0), "zero is a real threshold");
    assert_eq!(Limit::decode(1440i64), Limit::Enabled(1440));
}

#[test]
fn limits_round_trip_through_the_store_encoding() {
    assert_eq!(Limit::decode(Limit::new(true, 2.5).encode()), Limit::Enabled(2.5));
    assert_eq!(Limit::decode(Limit::new(false, 2.5).encode()), Limit::<f64>::Disabled);
    assert_eq!(Limit::<i64>::Disabled.to_wire(), (false, -1));
    assert_eq!(Limit::Enabled(30i64).to_wire(), (true, 30));
    assert_eq!(Limit::Enabled(30i64).threshold(), Some(30));
    assert_eq!(Limit::<i64>::Disabled.to_string(), "disabled");
}
