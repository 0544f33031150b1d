mod common;

use std::fs;
use std::net::IpAddr;
use std::sync::Arc;
use std::thread;

use webprefs::config::Settings;
use webprefs::interface::PreferencesInterface;
use webprefs::subnet::Subnet;

#[test]
fn concurrent_patches_never_interleave() {
    let interface = Arc::new(PreferencesInterface::new(common::preferences()));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let interface = Arc::clone(&interface);
            thread::spawn(move || {
                let patch = format!(
                    r#"{{"schedule_from_hour": {i}, "schedule_from_min": {i}, "listen_port": {}}}"#,
                    6000 + i
                );
                interface.apply(&patch).expect("apply ok");
                let snapshot = interface.snapshot().expect("snapshot");
                assert_eq!(snapshot["schedule_from_hour"], snapshot["schedule_from_min"]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }
    let snapshot = interface.snapshot().unwrap();
    let hour = snapshot["schedule_from_hour"].as_i64().unwrap();
    assert_eq!(snapshot["schedule_from_min"].as_i64().unwrap(), hour);
    assert_eq!(snapshot["listen_port"].as_i64().unwrap(), 6000 + hour, "the last patch wins as a whole");
}

#[test]
fn locale_is_readable_through_the_interface() {
    let interface = PreferencesInterface::new(common::preferences());
    let handle = interface.locale();
    interface.apply(r#"{"locale": "de"}"#).unwrap();
    assert_eq!(handle.load().id, "de");
}

#[test]
fn default_save_path_follows_patches() {
    let interface = PreferencesInterface::new(common::preferences());
    assert_eq!(interface.default_save_path().unwrap(), "");
    interface.apply(r#"{"save_path": "/srv/downloads"}"#).unwrap();
    assert_eq!(interface.default_save_path().unwrap(), "/srv/downloads");
}

#[test]
fn settings_load_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("prefs.json");
    fs::write(&path, r#"{"port": 9191, "default_locale": "sv", "check_folders": false}"#).unwrap();
    let settings = Settings::load(path.to_str()).expect("settings");
    assert_eq!(settings.port, 9191);
    assert_eq!(settings.default_locale, "sv");
    assert!(!settings.check_folders);
    assert_eq!(settings.bind, "127.0.0.1", "missing settings keep their default");
    assert_eq!(settings.socket_addr().unwrap().port(), 9191);
}

#[test]
fn standalone_applies_the_seed_patch() {
    let dir = tempfile::tempdir().expect("temp dir");
    let seed = dir.path().join("seed.json");
    fs::write(&seed, r#"{"dht": true, "locale": "fr"}"#).unwrap();
    let settings = Settings { seed: Some(seed), check_folders: false, ..Settings::default() };
    let interface = webprefs::standalone(&settings).expect("standalone");
    let snapshot = interface.snapshot().unwrap();
    assert_eq!(snapshot["dht"], true);
    assert_eq!(snapshot["locale"], "fr");
    assert_eq!(interface.locale().load().id, "fr");
}

#[test]
fn subnets_parse_into_address_and_prefix() {
    let net: Subnet = " 192.168.0.0 / 16 ".parse().unwrap();
    assert_eq!(net.address(), "192.168.0.0".parse::<IpAddr>().unwrap());
    assert_eq!(net.prefix(), 16);
    let everything: Subnet = "0.0.0.0/0".parse().unwrap();
    assert_eq!(everything.to_string(), "0.0.0.0/0");
    let host: Subnet = "10.1.2.3".parse().unwrap();
    assert_eq!(host.to_string(), "10.1.2.3/32");
    assert!("10.0.0.0/33".parse::<Subnet>().is_err());
    assert!("fe80::/129".parse::<Subnet>().is_err());
    assert!("not-an-ip/8".parse::<Subnet>().is_err());
}
