// tests/cli.rs

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;
use toolstrap::cli::CliArgs;
use toolstrap::config::{default_config_path, ConfigFile};
use toolstrap::logging::{level_from_log_level, parse_level_str};
use toolstrap::types::{Behaviour, BuildSystemKind, Platform, Toolset};
use toolstrap::{run, Selection};
use toolstrap_test_utils::builders::ConfigFileBuilder;

fn parse(args: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("toolstrap").chain(args.iter().copied())).unwrap()
}

#[test]
fn parses_full_invocation() {
    let args = parse(&[
        "--platform",
        "windows",
        "--toolset",
        "vs",
        "--behave",
        "build-release",
        "--build-system",
        "premake",
    ]);

    assert_eq!(args.platform, Some(Platform::Windows));
    assert_eq!(args.toolset, Some(Toolset::VisualStudio));
    assert_eq!(args.behave, Some(Behaviour::BuildRelease));
    assert_eq!(args.build_system, Some(BuildSystemKind::Premake));
    assert_eq!(args.config, None);
    assert!(!args.dry_run);
}

#[test]
fn toolset_accepts_both_spellings_of_gnu() {
    assert_eq!(parse(&["--toolset", "GNU"]).toolset, Some(Toolset::Gnu));
    assert_eq!(parse(&["--toolset", "gnu"]).toolset, Some(Toolset::Gnu));
}

#[test]
fn build_system_underscore_alias() {
    let args = parse(&["--build_system", "premake"]);
    assert_eq!(args.build_system, Some(BuildSystemKind::Premake));
}

#[test]
fn every_behaviour_parses() {
    for (raw, expected) in [
        ("generate", Behaviour::Generate),
        ("build-debug", Behaviour::BuildDebug),
        ("build-release", Behaviour::BuildRelease),
        ("clean", Behaviour::Clean),
    ] {
        assert_eq!(parse(&["--behave", raw]).behave, Some(expected));
    }
}

#[test]
fn invalid_values_are_rejected() {
    let err = CliArgs::try_parse_from(["toolstrap", "--platform", "amiga"]).unwrap_err();
    assert!(err.use_stderr());

    assert!(CliArgs::try_parse_from(["toolstrap", "--behave", "deploy"]).is_err());
    assert!(CliArgs::try_parse_from(["toolstrap", "--toolset", "msvc"]).is_err());
}

#[test]
fn help_is_not_an_error_exit() {
    let err = CliArgs::try_parse_from(["toolstrap", "--help"]).unwrap_err();
    assert!(!err.use_stderr());
}

#[test]
fn selection_prefers_cli_then_config_then_defaults() {
    let cfg = ConfigFileBuilder::new()
        .platform(Platform::Linux)
        .toolset(Toolset::VisualStudio)
        .build();

    let from_cfg = Selection::resolve(&parse(&[]), &cfg);
    assert_eq!(from_cfg.platform, Platform::Linux);
    assert_eq!(from_cfg.toolset, Toolset::VisualStudio);

    let from_cli = Selection::resolve(&parse(&["--platform", "windows", "--toolset", "GNU"]), &cfg);
    assert_eq!(from_cli.platform, Platform::Windows);
    assert_eq!(from_cli.toolset, Toolset::Gnu);

    let defaults = Selection::resolve(&parse(&[]), &ConfigFile::default());
    assert_eq!(defaults.platform, Platform::Emscripten);
    assert_eq!(defaults.toolset, Toolset::Gnu);
    assert_eq!(defaults.build_system, BuildSystemKind::Premake);
}

#[test]
fn log_level_names() {
    assert_eq!(parse_level_str("debug"), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str(" WARNING "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("loud"), None);

    let args = parse(&["--log-level", "trace"]);
    assert_eq!(
        args.log_level.map(level_from_log_level),
        Some(tracing::Level::TRACE)
    );
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn dry_run_succeeds_without_behaviour() {
    let root = tempfile::tempdir().unwrap();
    let file = config_file("[build]\nplatform = \"linux\"\ntoolset = \"GNU\"\n");
    let args = parse(&[
        "--dry-run",
        "--config",
        file.path().to_str().unwrap(),
        "--root",
        root.path().to_str().unwrap(),
    ]);

    assert!(run(args).unwrap());
}

#[test]
fn missing_behaviour_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let file = config_file("");
    let args = parse(&[
        "--config",
        file.path().to_str().unwrap(),
        "--root",
        root.path().to_str().unwrap(),
    ]);

    let err = run(args).unwrap_err();
    assert!(err.to_string().contains("no behaviour given"), "{err}");
}

#[test]
fn invalid_config_is_an_error() {
    let file = config_file("[tools.cmake]\nenabled = true\n");
    let args = parse(&["--dry-run", "--config", file.path().to_str().unwrap()]);

    assert!(run(args).is_err());
}

#[test]
fn config_defaults_to_toolstrap_toml_in_working_directory() {
    assert_eq!(default_config_path(), PathBuf::from("Toolstrap.toml"));

    // No Toolstrap.toml at the package root, so defaults apply.
    let root = tempfile::tempdir().unwrap();
    let args = parse(&["--dry-run", "--root", root.path().to_str().unwrap()]);
    assert_eq!(args.config, None);

    assert!(run(args).unwrap());
}
