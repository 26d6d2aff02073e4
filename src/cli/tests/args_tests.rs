use super::args::CliArgs;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parses_files_and_out_dir() {
    let args = CliArgs::try_parse_from(["unamdify", "--outDir", "dist", "a.js", "src"])
        .expect("should parse");
    assert_eq!(args.out_dir, Some(PathBuf::from("dist")));
    assert_eq!(args.files, vec![PathBuf::from("a.js"), PathBuf::from("src")]);
    assert!(!args.write);
    assert!(!args.check);
}

#[test]
fn test_accepts_kebab_case_out_dir_alias() {
    let args = CliArgs::try_parse_from(["unamdify", "--out-dir", "dist"]).expect("should parse");
    assert_eq!(args.out_dir, Some(PathBuf::from("dist")));
}

#[test]
fn test_parses_short_flags() {
    let args = CliArgs::try_parse_from(["unamdify", "-w", "-c", "cfg.json", "a.js"])
        .expect("should parse");
    assert!(args.write);
    assert_eq!(args.config, Some(PathBuf::from("cfg.json")));
}

#[test]
fn test_splits_extensions_on_commas() {
    let args =
        CliArgs::try_parse_from(["unamdify", "--extensions", "js,mjs", "src"]).expect("should parse");
    assert_eq!(
        args.extensions,
        Some(vec!["js".to_string(), "mjs".to_string()])
    );
}

#[test]
fn test_parses_pretty_value() {
    let args = CliArgs::try_parse_from(["unamdify", "--pretty", "false"]).expect("should parse");
    assert_eq!(args.pretty, Some(false));
    let args = CliArgs::try_parse_from(["unamdify"]).expect("should parse");
    assert_eq!(args.pretty, None);
    assert!(args.files.is_empty());
}

#[test]
fn test_rejects_conflicting_output_modes() {
    assert!(CliArgs::try_parse_from(["unamdify", "-w", "-o", "dist", "a.js"]).is_err());
    assert!(CliArgs::try_parse_from(["unamdify", "--check", "-w", "a.js"]).is_err());
    assert!(CliArgs::try_parse_from(["unamdify", "--check", "-o", "dist", "a.js"]).is_err());
}
