use super::args::CliArgs;
use super::config::{
    CONFIG_FILE_NAME, OutputMode, UnamdifyConfig, find_config, load_config, parse_config,
    resolve_options,
};
use clap::Parser;
use std::path::{Path, PathBuf};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("unamdify").chain(argv.iter().copied()))
        .expect("should parse")
}

#[test]
fn test_parses_config_fields() {
    let config = parse_config(r#"{ "files": ["src"], "outDir": "dist", "extensions": ["js", "mjs"] }"#)
        .expect("should parse");
    assert_eq!(
        config,
        UnamdifyConfig {
            files: Some(vec!["src".to_string()]),
            out_dir: Some("dist".to_string()),
            extensions: Some(vec!["js".to_string(), "mjs".to_string()]),
        }
    );
}

#[test]
fn test_empty_config_is_default() {
    assert_eq!(parse_config("{}").expect("should parse"), UnamdifyConfig::default());
}

#[test]
fn test_rejects_unknown_config_fields() {
    assert!(parse_config(r#"{ "outdir": "dist" }"#).is_err());
}

#[test]
fn test_load_config_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("nope.json")).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read config"));
}

#[test]
fn test_find_config_looks_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(find_config(dir.path()), None);
    let path = write_file(dir.path(), CONFIG_FILE_NAME, "{}");
    assert_eq!(find_config(dir.path()), Some(path));
}

#[test]
fn test_defaults_without_config() {
    let dir = tempfile::tempdir().unwrap();
    let options = resolve_options(&args(&["a.js"]), dir.path()).unwrap();
    assert_eq!(options.files, vec![dir.path().join("a.js")]);
    assert_eq!(options.output, OutputMode::Stdout);
    assert_eq!(options.extensions, vec!["js".to_string()]);
}

#[test]
fn test_config_paths_are_relative_to_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("project");
    std::fs::create_dir_all(&nested).unwrap();
    write_file(
        &nested,
        "build.json",
        r#"{ "files": ["src"], "outDir": "dist", "extensions": [".MJS"] }"#,
    );

    let options = resolve_options(&args(&["-c", "project/build.json"]), dir.path()).unwrap();
    assert_eq!(options.files, vec![nested.join("src")]);
    assert_eq!(options.output, OutputMode::OutDir(nested.join("dist")));
    assert_eq!(options.extensions, vec!["mjs".to_string()]);
}

#[test]
fn test_cli_values_override_config() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        CONFIG_FILE_NAME,
        r#"{ "files": ["src"], "outDir": "dist", "extensions": ["mjs"] }"#,
    );

    let options = resolve_options(
        &args(&["--outDir", "out", "--extensions", "js", "lib"]),
        dir.path(),
    )
    .unwrap();
    assert_eq!(options.files, vec![dir.path().join("lib")]);
    assert_eq!(options.output, OutputMode::OutDir(dir.path().join("out")));
    assert_eq!(options.extensions, vec!["js".to_string()]);
}

#[test]
fn test_write_and_check_take_precedence_over_config_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), CONFIG_FILE_NAME, r#"{ "outDir": "dist" }"#);

    let options = resolve_options(&args(&["-w", "a.js"]), dir.path()).unwrap();
    assert_eq!(options.output, OutputMode::InPlace);
    let options = resolve_options(&args(&["--check", "a.js"]), dir.path()).unwrap();
    assert_eq!(options.output, OutputMode::Check);
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), CONFIG_FILE_NAME, "{ not json");
    assert!(resolve_options(&args(&["a.js"]), dir.path()).is_err());
}
