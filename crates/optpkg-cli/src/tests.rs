use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use optpkg_installer::{FileOperation, TaskReport, TaskSummary};

use crate::completion::write_completions_script;
use crate::dispatch::{Cli, Commands};
use crate::prompt::parse_answer;
use crate::render::{preview_lines, report_lines, summary_lines, OutputStyle};

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn parses_install_command() {
    let cli = Cli::try_parse_from(["optpkg", "install", "app-v1", "app.tar.gz"])
        .expect("must parse install");
    match cli.command {
        Commands::Install { name, files } => {
            assert_eq!(name, "app-v1");
            assert_eq!(files, vec![PathBuf::from("app.tar.gz")]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_update_flags() {
    let cli = Cli::try_parse_from([
        "optpkg",
        "update",
        "app-v1",
        "app.tar",
        "--keep",
        "/opt/app-v1/conf.xml",
        "--delete",
    ])
    .expect("must parse update");
    match cli.command {
        Commands::Update {
            name,
            files,
            keep,
            delete,
        } => {
            assert_eq!(name, "app-v1");
            assert_eq!(files.len(), 1);
            assert_eq!(keep, vec![PathBuf::from("/opt/app-v1/conf.xml")]);
            assert!(delete);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn install_requires_at_least_one_file() {
    assert!(Cli::try_parse_from(["optpkg", "install", "app-v1"]).is_err());
}

#[test]
fn remove_scope_flags_conflict() {
    assert!(Cli::try_parse_from([
        "optpkg",
        "remove",
        "app-v1",
        "--desktop-only",
        "--path-only"
    ])
    .is_err());
}

#[test]
fn parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["optpkg", "remove", "app-v1", "-y", "--root", "/tmp/opt"])
        .expect("must parse global flags");
    assert!(cli.assume_yes);
    assert_eq!(cli.root, Some(PathBuf::from("/tmp/opt")));
}

#[test]
fn answer_parsing_accepts_default_yes() {
    for answer in ["", "\n", "y", "Y", "yes", " YES \n"] {
        assert!(parse_answer(answer), "{answer:?} must mean yes");
    }
    for answer in ["n", "no", "q", "yess"] {
        assert!(!parse_answer(answer), "{answer:?} must mean no");
    }
}

#[test]
fn summary_renders_header_and_details() {
    let summary = TaskSummary::new("install", "app-v1")
        .detail("Symlink", "/opt/app-v1".to_string())
        .detail("File", "/tmp/app.tar".to_string());
    let lines = summary_lines(&summary, OutputStyle::Plain);
    assert_eq!(lines[0], "install: app-v1");
    assert_eq!(lines[1], "  Symlink: /opt/app-v1");
    assert_eq!(lines[2], "  File: /tmp/app.tar");
}

#[test]
fn preview_renders_copy_link_and_delete_forms() {
    let ops = vec![
        FileOperation::copy("/tmp/app.tar", "/opt/.installer/app-v1"),
        FileOperation::link("/opt/.installer/app-v1", "/opt/app-v1"),
        FileOperation::copy("/opt/app-v1", "/opt/app-v1"),
    ];
    let lines = preview_lines(&ops, OutputStyle::Plain);
    assert_eq!(lines[0], "  copy /tmp/app.tar -> /opt/.installer/app-v1");
    assert_eq!(lines[1], "  link /opt/.installer/app-v1 -> /opt/app-v1");
    assert_eq!(lines[2], "  delete /opt/app-v1");
}

#[test]
fn preview_marks_overwrites() {
    let dir = tempfile::TempDir::new().expect("must create temp dir");
    let existing = dir.path().join("existing.txt");
    std::fs::write(&existing, "x").expect("must write");

    let ops = vec![FileOperation::copy(dir.path().join("src.txt"), existing)];
    let lines = preview_lines(&ops, OutputStyle::Plain);
    assert!(lines[0].ends_with("(replaces existing)"), "{}", lines[0]);
}

#[test]
fn empty_preview_says_so() {
    let lines = preview_lines(&[], OutputStyle::Plain);
    assert_eq!(lines, vec!["No planned changes".to_string()]);
}

#[test]
fn report_renders_changes_and_warnings() {
    let mut report = TaskReport::new();
    report.created.push(PathBuf::from("/opt/app-v1"));
    report.deleted.push(PathBuf::from("/usr/local/bin/app"));
    report.warnings.push("something odd".to_string());

    let lines = report_lines(&report, OutputStyle::Plain);
    assert_eq!(lines[0], "created /opt/app-v1");
    assert_eq!(lines[1], "deleted /usr/local/bin/app");
    assert_eq!(lines[2], "warning: something odd");
}

#[test]
fn empty_report_renders_noop_line() {
    let lines = report_lines(&TaskReport::new(), OutputStyle::Plain);
    assert_eq!(lines, vec!["No files were changed".to_string()]);
}

#[test]
fn completions_script_is_generated() {
    let mut output = Vec::new();
    write_completions_script(Shell::Bash, &mut output).expect("must generate completions");
    let script = String::from_utf8(output).expect("script must be UTF-8");
    assert!(script.contains("optpkg"));
}
