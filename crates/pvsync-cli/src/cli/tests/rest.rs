//! Tests for normalize, codes, config, completions.

use super::parse;
use crate::cli::CliCommand;
use pvsync_core::config::PvsyncConfig;
use std::path::PathBuf;

#[test]
fn cli_parse_normalize() {
    match parse(&["pvsync", "normalize", "--dest-root", "archive"]) {
        CliCommand::Normalize(args) => {
            assert!(args.source_root.is_none());
            let mut cfg = PvsyncConfig::default();
            args.apply(&mut cfg);
            assert_eq!(cfg.source_root, PathBuf::from("pv"));
            assert_eq!(cfg.dest_root, PathBuf::from("archive"));
        }
        _ => panic!("expected Normalize"),
    }
}

#[test]
fn cli_parse_codes() {
    match parse(&["pvsync", "codes"]) {
        CliCommand::Codes => {}
        _ => panic!("expected Codes"),
    }
}

#[test]
fn cli_parse_config() {
    match parse(&["pvsync", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["pvsync", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(<crate::cli::Cli as clap::Parser>::try_parse_from(["pvsync", "download"]).is_err());
}
