//! End-to-end tests for a full report run
//!
//! These tests write a configuration, an export and screenshots into a
//! temporary directory and check the artifacts of `ReportGenerator::run`.

mod common;

use accomplishment_report::{REPORT_FILE_NAME, ReportConfig, ReportGenerator};
use common::{tsv_line, write_tsv, ymd};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path, extra: &str) -> ReportConfig {
    let text = format!(
        r#"
output_dir = "out"
render_dates = ["2023-10-30", "2023-11-01"]
{extra}

[developer]
name = "Juan Dela Cruz"
position = "Information Systems Analyst I"
date_hired = "2023-01-16"

[reviewer]
name = "Maria Santos"
position = "Information Systems Analyst III"

[[projects]]
name = "eGov-BEBS"
tsv = "tsv/egov-bebs.tsv"
images = "screenshots"
details = "Digitize part of the budgeting process."
"#
    );
    let path = dir.join("report.toml");
    fs::write(&path, text).unwrap();
    ReportConfig::load(&path).unwrap()
}

fn setup(dir: &Path) {
    fs::create_dir_all(dir.join("tsv")).unwrap();
    fs::create_dir_all(dir.join("screenshots")).unwrap();
    fs::write(dir.join("screenshots/b-dashboard.PNG"), b"png").unwrap();
    fs::write(dir.join("screenshots/a-login.jpg"), b"jpg").unwrap();
    fs::write(dir.join("screenshots/c settings page.png"), b"png").unwrap();
    fs::write(dir.join("screenshots/notes.txt"), b"text").unwrap();

    write_tsv(
        &dir.join("tsv"),
        "egov-bebs.tsv",
        &[
            tsv_line("Login page", "Done", "MVP", "16", "2023-10-02", "2023-10-31"),
            tsv_line("Budget upload", "In Progress", "Budget", "8", "2023-11-01", ""),
            tsv_line("Audit trail", "On Hold", "Miscellaneous Tasks", "5", "", ""),
            tsv_line("Export to PDF", "Todo P2", "Budget", "13", "", ""),
            tsv_line(
                "Legacy cleanup",
                "Archived-Old",
                "Miscellaneous Tasks",
                "3",
                "2023-03-01",
                "2023-03-02",
            ),
        ],
    );
}

#[test]
fn test_full_run_writes_all_artifacts() {
    let dir = TempDir::new().unwrap();
    setup(dir.path());
    let config = write_config(dir.path(), "");

    let outcome = ReportGenerator::with_date(config, ymd(2023, 11, 4)).run().unwrap();

    let out = dir.path().join("out").join("2023-11-04");
    assert_eq!(outcome.output_dir, out);
    assert_eq!(outcome.report, out.join(REPORT_FILE_NAME));
    for name in [
        "egov-bebs-actual-timeline.svg",
        "egov-bebs-projected-timeline.svg",
        "egov-bebs-statistics.csv",
        REPORT_FILE_NAME,
    ] {
        assert!(out.join(name).is_file(), "missing {name}");
    }

    let csv = fs::read_to_string(out.join("egov-bebs-statistics.csv")).unwrap();
    assert_eq!(csv.lines().nth(1), Some("0,1,0,1,1,1,4,50%"));

    let summary = &outcome.projects[0];
    assert_eq!(summary.rows, 5);
    let modules: Vec<&str> = summary.spans.iter().map(|s| s.module.as_str()).collect();
    // Miscellaneous Tasks has no dated row left after archive exclusion
    assert_eq!(modules, vec!["MVP", "Budget"]);
    assert_eq!(summary.spans[0].end, ymd(2023, 10, 12));
    // Budget: 21 points from 2023-11-01 -> 3 working + 8 rest days
    assert_eq!(summary.spans[1].end, ymd(2023, 11, 12));

    let report = fs::read_to_string(&outcome.report).unwrap();
    assert!(report.contains("**Cutoff period:** 2023-11-01 to 2023-11-15"));
    assert!(report.contains("**Cutoff no.:** 20"));
    assert!(report.contains("| Prepared by | Juan Dela Cruz | Information Systems Analyst I |"));
    assert!(report.contains("## eGov-BEBS"));
    assert!(report.contains("#### 2023-10-30"));
    assert!(report.contains("#### 2023-11-01"));
    assert!(report.contains("![Actual timeline](<egov-bebs-actual-timeline.svg>)"));
    assert!(report.contains("| 0 | 1 | 0 | 1 | 1 | 1 | 4 | 50% |"));

    // Tasks shown under a render date are not repeated under "Other tasks"
    let other = report.split("#### Other tasks").nth(1).unwrap();
    let other = other.split("### Progress").next().unwrap();
    assert!(other.contains("Audit trail"));
    assert!(!other.contains("Login page"));
    assert!(!other.contains("Budget upload"));

    let login = report.find("egov-bebs-screenshots/a-login.jpg").unwrap();
    let dashboard = report.find("b-dashboard.PNG").unwrap();
    assert!(login < dashboard);
    assert!(!report.contains("notes.txt"));

    let actual = fs::read_to_string(out.join("egov-bebs-actual-timeline.svg")).unwrap();
    assert!(actual.contains("Login page"));
    assert!(actual.contains("Legacy cleanup"));
    assert!(!actual.contains("Audit trail"));
}

/// Targets of every `![..](<..>)` image link in a Markdown document
fn image_links(markdown: &str) -> Vec<&str> {
    markdown
        .split("](<")
        .skip(1)
        .filter_map(|rest| rest.split_once(">)").map(|(link, _)| link))
        .collect()
}

#[test]
fn test_report_image_links_resolve_from_report_directory() {
    let dir = TempDir::new().unwrap();
    setup(dir.path());
    let config = write_config(dir.path(), "");

    let outcome = ReportGenerator::with_date(config, ymd(2023, 11, 4)).run().unwrap();

    let report = fs::read_to_string(&outcome.report).unwrap();
    let base = outcome.report.parent().unwrap();
    let links = image_links(&report);
    assert_eq!(
        links,
        vec![
            "egov-bebs-actual-timeline.svg",
            "egov-bebs-projected-timeline.svg",
            "egov-bebs-screenshots/a-login.jpg",
            "egov-bebs-screenshots/b-dashboard.PNG",
            "egov-bebs-screenshots/c settings page.png",
        ]
    );
    for link in links {
        assert!(base.join(link).is_file(), "unresolved link {link}");
    }
    assert_eq!(
        fs::read(base.join("egov-bebs-screenshots/a-login.jpg")).unwrap(),
        b"jpg"
    );
    assert!(!base.join("egov-bebs-screenshots/notes.txt").exists());
}

#[test]
fn test_custom_template() {
    let dir = TempDir::new().unwrap();
    setup(dir.path());
    fs::write(
        dir.path().join("custom.hbs"),
        "{{developer_name}}|{{#each projects}}{{name}}:{{statistics.completion}}{{/each}}",
    )
    .unwrap();
    let config = write_config(dir.path(), "template = \"custom.hbs\"");

    let outcome = ReportGenerator::with_date(config, ymd(2023, 11, 20)).run().unwrap();

    let report = fs::read_to_string(&outcome.report).unwrap();
    assert_eq!(report, "Juan Dela Cruz|eGov-BEBS:50%");
}

#[test]
fn test_template_with_unknown_field_fails() {
    let dir = TempDir::new().unwrap();
    setup(dir.path());
    fs::write(dir.path().join("custom.hbs"), "{{no_such_field}}").unwrap();
    let config = write_config(dir.path(), "template = \"custom.hbs\"");

    let result = ReportGenerator::with_date(config, ymd(2023, 11, 20)).run();

    assert!(result.is_err());
}

#[test]
fn test_missing_images_directory_fails() {
    let dir = TempDir::new().unwrap();
    setup(dir.path());
    fs::remove_dir_all(dir.path().join("screenshots")).unwrap();
    let config = write_config(dir.path(), "");

    let err = ReportGenerator::with_date(config, ymd(2023, 11, 4))
        .run()
        .unwrap_err();

    assert!(format!("{err:#}").contains("images directory"));
}

#[test]
fn test_malformed_export_aborts_run() {
    let dir = TempDir::new().unwrap();
    setup(dir.path());
    write_tsv(
        &dir.path().join("tsv"),
        "egov-bebs.tsv",
        &[tsv_line("Broken", "Done", "MVP", "1", "yesterday", "")],
    );
    let config = write_config(dir.path(), "");

    let err = ReportGenerator::with_date(config, ymd(2023, 11, 4))
        .run()
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("eGov-BEBS"), "{message}");
    assert!(message.contains("Date Started"), "{message}");
}
