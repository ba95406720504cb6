use std::collections::BTreeSet;

use atlas_core::error::{AtlasError, StateError};
use atlas_core::scan::RepositoryScanner;
use atlas_core::session::SessionEnd;
use atlas_core::survey::{DependencyOutcome, InsightOutcome};
use atlas_core::types::Clarity;
use atlas_test::{
    TestRepo, WEB_SERVICE_OUTLIER_THRESHOLD, WEB_SERVICE_SIGNIFICANT, WEB_SERVICE_TOTAL_FILES,
};

const API_INSIGHTS: &[&str] = &[
    "Routes incoming HTTP requests to handler functions through a static table, \
     which keeps dispatch cheap and predictable under load",
    "Validates request payloads against typed schemas before any handler runs, \
     thereby keeping malformed input away from the database layer",
    "Generates API bindings from the protocol definitions at build time, \
     so that client and server types never drift apart silently",
    "Handles graceful shutdown by draining in-flight connections before exit, \
     because abrupt termination previously dropped customer orders mid write",
    "Loads listener settings from the YAML config file at startup and caches them, \
     allowing operators to tune ports without recompiling",
];

fn expected_significant() -> BTreeSet<String> {
    WEB_SERVICE_SIGNIFICANT
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

// ── Scanning ─────────────────────────────────────────────────────

#[test]
fn web_service_scan_classifies_every_file_kind() {
    let repo = TestRepo::web_service();
    let report = RepositoryScanner::from_config(repo.path(), &repo.config())
        .scan()
        .unwrap();

    assert_eq!(report.total_files, WEB_SERVICE_TOTAL_FILES);
    assert_eq!(report.unreadable, 0);
    assert_eq!(report.outlier_threshold, Some(WEB_SERVICE_OUTLIER_THRESHOLD));
    assert_eq!(report.significant_paths(), expected_significant());
}

#[test]
fn survey_files_never_count_toward_coverage() {
    let repo = TestRepo::web_service();
    let mut survey = repo.init_survey("web");
    survey.add_system("Api").unwrap();
    survey.start_session().unwrap();
    repo.write_config("[gates]\ncoverage_target = 80.0\n");

    let report = survey.scan().unwrap();
    assert_eq!(report.total_files, WEB_SERVICE_TOTAL_FILES);
    assert_eq!(report.significant_paths(), expected_significant());
}

#[test]
fn gitignore_can_be_disabled() {
    let repo = TestRepo::web_service();
    repo.write_config("[scan]\nuse_gitignore = false\n");
    let report = RepositoryScanner::from_config(repo.path(), &repo.config())
        .scan()
        .unwrap();

    // app.log and logs/out.txt are now walked; only app.log clears the floor.
    assert_eq!(report.total_files, WEB_SERVICE_TOTAL_FILES + 2);
    assert!(report.significant.contains_key("app.log"));
    assert!(!report.significant.contains_key("logs/out.txt"));
}

#[test]
fn extra_data_directories_exclude_files() {
    let repo = TestRepo::web_service();
    repo.write_config("[classification]\nextra_data_directories = [\"docs\"]\n");
    let report = RepositoryScanner::from_config(repo.path(), &repo.config())
        .scan()
        .unwrap();

    let mut expected = expected_significant();
    expected.remove("docs/guide.md");
    assert_eq!(report.significant_paths(), expected);
}

// ── Intake workflow ──────────────────────────────────────────────

#[test]
#[allow(clippy::float_cmp)]
fn full_survey_reaches_gate_a() {
    let repo = TestRepo::web_service();
    let mut survey = repo.init_survey("web");
    assert_eq!(survey.state().metadata.project_type, "Rust Project");

    survey.add_system("Api").unwrap();
    survey.add_system("Storage").unwrap();
    survey
        .update_description("Api", Some("HTTP surface of the service"))
        .unwrap();
    survey
        .map_files(
            "Api",
            &[
                "src/main.rs",
                "src/api/routes.rs",
                "src/api/handlers.rs",
                "src/generated.rs",
                "config/settings.yaml",
            ],
        )
        .unwrap();
    survey
        .map_files("Storage", &["src/db/pool.rs", "src/db/models.rs"])
        .unwrap();
    for insight in API_INSIGHTS {
        assert_eq!(
            survey.add_insight("Api", insight, false).unwrap(),
            InsightOutcome::Added,
            "rejected: {insight}"
        );
    }
    assert_eq!(
        survey
            .add_dependency("Api", "Storage", "reads and writes users", false)
            .unwrap(),
        DependencyOutcome::Linked {
            created_target: false
        }
    );

    let api = survey.system("Api").unwrap();
    assert_eq!(api.clarity, Clarity::High);
    assert_eq!(api.completeness, 80);
    assert_eq!(survey.system("Storage").unwrap().completeness, 8);

    let state = survey.state();
    assert_eq!(state.metadata.scan_stats.mapped_files_count, 7);
    assert_eq!(state.metadata.scan_stats.coverage_percentage, 77.8);
    assert_eq!(state.progress.estimated_overall_completeness, 44.0);
    assert_eq!(state.progress.systems_complete, 0);

    survey
        .map_files("Storage", &["tests/api_test.rs", "docs/guide.md"])
        .unwrap();
    let status = survey.status().unwrap();
    assert!(status.gates.coverage_met);
    assert_eq!(survey.state().metadata.scan_stats.coverage_quality, 100.0);

    // A fresh process sees the same document.
    let reopened = repo.open_survey();
    assert_eq!(reopened.state().systems, survey.state().systems);
    assert!(!reopened.restored_from_backup());
}

#[test]
fn persisted_document_uses_expected_field_names() {
    let repo = TestRepo::web_service();
    let mut survey = repo.init_survey("web");
    survey.add_system("Api").unwrap();
    survey.map_files("Api", &["src/main.rs"]).unwrap();

    let text = std::fs::read_to_string(repo.path().join("architecture.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["schema_version"], "2.2");
    assert_eq!(json["metadata"]["phase"], "survey");
    assert_eq!(json["metadata"]["scan_stats"]["significant_files_total"], 9);
    assert!(json["metadata"]["session_history"].is_array());
    assert_eq!(json["systems"]["Api"]["clarity"], "low");
    assert_eq!(json["systems"]["Api"]["key_files"][0], "src/main.rs");
    assert_eq!(json["progress"]["systems_identified"], 1);
}

#[test]
fn stale_mapped_paths_are_kept_but_not_counted() {
    let repo = TestRepo::web_service();
    let mut survey = repo.init_survey("web");
    survey.add_system("Api").unwrap();
    survey
        .map_files("Api", &["src/main.rs", "src/removed.rs"])
        .unwrap();

    let stats = &survey.state().metadata.scan_stats;
    assert_eq!(stats.mapped_files_count, 1);
    assert!(survey.system("Api").unwrap().key_files.contains("src/removed.rs"));
    assert_eq!(survey.system("Api").unwrap().completeness, 8);
}

#[test]
fn strictness_comes_from_config() {
    let text = "Implements retry with jittered backoff for outbound webhook calls everywhere";

    let strict = TestRepo::web_service();
    let mut survey = strict.init_survey("web");
    survey.add_system("Hooks").unwrap();
    let InsightOutcome::Rejected(reasons) = survey.add_insight("Hooks", text, false).unwrap()
    else {
        panic!("standard strictness should reject a 10-word insight");
    };
    assert_eq!(reasons.len(), 2);

    let lenient = TestRepo::web_service();
    lenient.write_config("[insights]\nstrictness = \"lenient\"\n");
    let mut survey = lenient.init_survey("web");
    survey.add_system("Hooks").unwrap();
    assert_eq!(
        survey.add_insight("Hooks", text, false).unwrap(),
        InsightOutcome::Added
    );
}

// ── Reporting ────────────────────────────────────────────────────

#[test]
fn validate_flags_unmapped_core_files() {
    let repo = TestRepo::web_service();
    let survey = repo.init_survey("web");
    let issues = survey.validate().unwrap();
    assert_eq!(
        issues,
        vec![
            "Found 7 unmapped significant files (sample: config/settings.yaml, \
             src/api/handlers.rs, src/api/routes.rs, src/db/models.rs, src/db/pool.rs)"
                .to_string()
        ]
    );
}

#[test]
fn coverage_detail_groups_by_directory() {
    let repo = TestRepo::web_service();
    let mut survey = repo.init_survey("web");
    survey.add_system("Api").unwrap();
    survey.map_files("Api", &["src/main.rs"]).unwrap();

    let detail = survey.coverage_detail().unwrap();
    let dirs: Vec<&str> = detail.directories.keys().map(String::as_str).collect();
    assert_eq!(dirs, ["config", "docs", "src", "src/api", "src/db", "tests"]);

    let src = &detail.directories["src"];
    assert_eq!((src.mapped, src.total), (1, 2));
    assert_eq!(src.unmapped, vec!["src/generated.rs".to_string()]);
    assert_eq!(
        detail.largest_unmapped.first(),
        Some(&("src/generated.rs".to_string(), 50_000))
    );
    assert_eq!(detail.largest_unmapped.len(), 8);
}

// ── Sessions ─────────────────────────────────────────────────────

#[test]
fn quiet_sessions_trigger_gate_b() {
    let repo = TestRepo::web_service();
    let mut survey = repo.init_survey("web");
    survey.add_system("Api").unwrap();

    let files = ["src/main.rs", "src/api/routes.rs", "src/api/handlers.rs"];
    for (i, file) in files.iter().enumerate() {
        let mut survey = repo.open_survey();
        survey.start_session().unwrap();

        let mut survey = repo.open_survey();
        survey.map_files("Api", &[*file]).unwrap();

        let mut survey = repo.open_survey();
        let SessionEnd::Recorded(record) = survey.end_session().unwrap() else {
            panic!("session {i} was not recorded");
        };
        assert_eq!((record.new_systems_found, record.new_files_mapped), (0, 1));

        let status = survey.status().unwrap();
        assert_eq!(status.gates.diminishing_returns, i == 2);
    }

    let survey = repo.open_survey();
    assert_eq!(survey.state().metadata.total_sessions, 3);
    assert_eq!(survey.state().metadata.session_history.len(), 3);
    assert!(!repo.path().join(".session_start").exists());
}

// ── Corruption ───────────────────────────────────────────────────

#[test]
fn corrupted_state_recovers_from_backup() {
    let repo = TestRepo::web_service();
    let mut survey = repo.init_survey("web");
    survey.add_system("Api").unwrap();
    survey.add_system("Storage").unwrap();
    std::fs::write(repo.path().join("architecture.json"), "{\"systems\": ").unwrap();

    let mut survey = repo.open_survey();
    assert!(survey.restored_from_backup());
    // The backup lags one save behind.
    assert!(survey.state().systems.contains_key("Api"));
    assert!(!survey.state().systems.contains_key("Storage"));

    survey.add_system("Storage").unwrap();
    let survey = repo.open_survey();
    assert!(!survey.restored_from_backup());
    assert_eq!(survey.state().systems.len(), 2);
}

#[test]
fn corrupted_state_without_backup_is_fatal() {
    let repo = TestRepo::web_service();
    repo.init_survey("web");
    std::fs::write(repo.path().join("architecture.json"), "not json").unwrap();

    let err = atlas_core::survey::Survey::open(repo.path(), &repo.config()).unwrap_err();
    assert!(matches!(
        err,
        AtlasError::State(StateError::Corrupted { .. })
    ));
}
