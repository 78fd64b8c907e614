use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use agenda_tool::{
    AgendaSettings, ArtifactFormat, PageBreakPolicy, RenderError, SettingsError,
    settings::{HTTP_ADDR_VAR, OUTPUT_DIR_VAR, SETTINGS_PATH_VAR},
};
use tempfile::{NamedTempFile, tempdir};

fn lookup(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_environment() {
    let settings = AgendaSettings::resolve_with(|_| None).unwrap();
    assert_eq!(settings, AgendaSettings::default());
    assert_eq!(settings.page.max_rows_per_page, 12);
    assert_eq!(settings.page.max_days_per_page, 5);
    assert_eq!(settings.http_addr, "0.0.0.0:3000");
}

#[test]
fn settings_file_is_loaded_and_partially_defaulted() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{ "page": { "max_rows_per_page": 4 }, "file_stem": "week-12" }"#,
    )
    .unwrap();

    let settings = AgendaSettings::resolve_with(lookup(&[(
        SETTINGS_PATH_VAR,
        file.path().display().to_string(),
    )]))
    .unwrap();

    assert_eq!(settings.page.max_rows_per_page, 4);
    assert_eq!(settings.page.max_days_per_page, 5);
    assert_eq!(settings.file_stem, "week-12");
    assert_eq!(settings.output_dir, PathBuf::from("."));
}

#[test]
fn environment_overrides_the_file() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{ "http_addr": "127.0.0.1:8000", "output_dir": "from-file" }"#,
    )
    .unwrap();

    let settings = AgendaSettings::resolve_with(lookup(&[
        (SETTINGS_PATH_VAR, file.path().display().to_string()),
        (HTTP_ADDR_VAR, "127.0.0.1:9090".to_string()),
        (OUTPUT_DIR_VAR, "/tmp/agendas".to_string()),
    ]))
    .unwrap();

    assert_eq!(settings.http_addr, "127.0.0.1:9090");
    assert_eq!(settings.output_dir, PathBuf::from("/tmp/agendas"));
}

#[test]
fn zero_page_limit_is_invalid() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), r#"{ "page": { "max_days_per_page": 0 } }"#).unwrap();

    let err = AgendaSettings::load(file.path()).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
}

#[test]
fn unreadable_and_malformed_files_are_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        AgendaSettings::load(&missing),
        Err(SettingsError::Io { path, .. }) if path == missing
    ));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        AgendaSettings::load(&broken),
        Err(SettingsError::Parse { .. })
    ));
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = AgendaSettings {
        page: PageBreakPolicy {
            max_rows_per_page: 6,
            max_days_per_page: 2,
        },
        output_dir: PathBuf::from("exports"),
        file_stem: "spring".into(),
        http_addr: "127.0.0.1:4000".into(),
    };

    settings.save(&path).unwrap();
    assert_eq!(AgendaSettings::load(&path).unwrap(), settings);
}

#[test]
fn save_failures_are_not_reported_as_parse_errors() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("no-such-dir").join("settings.json");
    let err = AgendaSettings::default().save(&target).unwrap_err();
    assert!(matches!(&err, SettingsError::Io { path, .. } if *path == target));
    assert!(!err.to_string().contains("parse"));

    let source = serde_json::from_str::<u8>("oops").unwrap_err();
    let err = SettingsError::Serialize {
        path: target.clone(),
        source,
    };
    assert!(err.to_string().starts_with("failed to serialize settings for"));
}

#[test]
fn table_renderer_follows_the_page_policy() {
    let mut settings = AgendaSettings::default();
    settings.page.max_rows_per_page = 0;
    assert!(matches!(
        ArtifactFormat::Table.renderer(&settings),
        Err(RenderError::InvalidPolicy(_))
    ));
}
