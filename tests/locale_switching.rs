mod common;

use std::fs;

use webprefs::locale::{
    new_locale_handle, ActiveLocale, DirectoryLoader, LoadError, LocaleSwitch, LocaleSwitcher,
    TranslationLoader,
};
use webprefs::memory::StaticLoader;

fn switcher(loader: impl TranslationLoader + 'static) -> LocaleSwitcher {
    LocaleSwitcher::new(Box::new(loader), new_locale_handle(ActiveLocale::untranslated("en")))
}

#[test]
fn recognized_locale_installs_its_translation() {
    let switcher = switcher(StaticLoader::new().with("de", common::german()));
    assert_eq!(switcher.switch_to("de"), LocaleSwitch::Loaded);
    let active = switcher.current();
    assert_eq!(active.id, "de");
    assert_eq!(active.translation.translate("Watch folder"), "Überwachter Ordner");
    assert_eq!(active.translation.translate("Something else"), "Something else");
}

#[test]
fn unrecognized_locale_is_still_recorded() {
    let switcher = switcher(StaticLoader::new());
    let handle = switcher.handle();
    match switcher.switch_to("xx_YY") {
        LocaleSwitch::Fallback { reason } => assert!(reason.contains("xx_YY")),
        other => panic!("expected a fallback, got {:?}", other),
    }
    let active = handle.load();
    assert_eq!(active.id, "xx_YY", "the requested id is kept");
    assert!(active.translation.is_identity());
}

#[test]
fn switching_to_the_active_locale_is_unchanged() {
    let switcher = switcher(StaticLoader::new().with("de", common::german()));
    assert_eq!(switcher.switch_to("en"), LocaleSwitch::Unchanged);
    switcher.switch_to("de");
    assert_eq!(switcher.switch_to("de"), LocaleSwitch::Unchanged);
}

#[test]
fn fallback_replaces_a_previous_translation() {
    let switcher = switcher(StaticLoader::new().with("de", common::german()));
    switcher.switch_to("de");
    assert!(!switcher.current().translation.is_identity());
    switcher.switch_to("fr");
    assert_eq!(switcher.current().id, "fr");
    assert_eq!(switcher.current().translation.translate("Watch folder"), "Watch folder");
}

#[test]
fn directory_loader_reads_json_translations() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("sv.json"), r#"{"Default folder": "Standardmapp"}"#).unwrap();
    fs::write(dir.path().join("broken.json"), "not json").unwrap();
    let loader = DirectoryLoader::new(dir.path());

    let translation = loader.load("sv").expect("sv loads");
    assert_eq!(translation.len(), 1);
    assert_eq!(translation.translate("Default folder"), "Standardmapp");
    assert_eq!(loader.load("nb"), Err(LoadError::NotFound("nb".into())));
    assert!(matches!(loader.load("broken"), Err(LoadError::Parse(_))));
    assert!(matches!(loader.load("../sv"), Err(LoadError::InvalidLocale(_))));
    assert!(matches!(loader.load(""), Err(LoadError::InvalidLocale(_))));
}
