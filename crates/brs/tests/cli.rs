//! CLI integration tests for brs commands.
//!
//! These tests focus on exit codes and basic behavioral verification,
//! not specific output formatting which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a brs command.
fn brs() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("brs").unwrap()
}

/// Helper to run `brs` in `dir` with HOME isolated to a subdirectory of it.
fn brs_in(dir: &Path) -> Command {
    let home = dir.join("home");
    fs::create_dir_all(&home).unwrap();
    let mut cmd = brs();
    cmd.env("HOME", &home).env_remove("BRS_LOG").current_dir(dir);
    cmd
}

/// Sample patents in JSON Lines form.
const PATENTS: &str = r#"{"publication_number": "US-1", "title": "Lithium battery charger", "abstract": "A charger for fast charging of lithium cells.", "cpc": "H02J7/00"}
{"publication_number": "US-2", "title": "Solar battery housing", "abstract": "A weatherproof housing.", "cpc": ["H01M50/20", "H02S40/38"]}

{"id": "US-3", "title": "Electric motor controller", "claims": "A controller driving a brushless motor."}
"#;

/// Writes the sample patents and builds an index at `<dir>/idx`.
fn indexed_dir() -> tempfile::TempDir {
    let dir = temp_dir();
    fs::write(dir.path().join("patents.jsonl"), PATENTS).unwrap();
    brs_in(dir.path())
        .args(["index", "patents.jsonl", "--index", "idx", "--workers", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 3 documents"));
    dir
}

/// Runs a JSON search and returns the ids in rank order.
fn search_ids(dir: &Path, query: &str) -> Vec<String> {
    let assert = brs_in(dir)
        .args(["search", query, "--index", "idx", "--json"])
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    value["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|hit| hit["id"].as_str().unwrap().to_string())
        .collect()
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();

        brs_in(dir.path()).arg("init").assert().success();

        let contents = fs::read_to_string(dir.path().join(".brs.toml")).unwrap();
        assert!(contents.contains("[search]"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".brs.toml"), "existing").unwrap();

        brs_in(dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites_existing() {
        let dir = temp_dir();
        fs::write(dir.path().join(".brs.toml"), "old content").unwrap();

        brs_in(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join(".brs.toml")).unwrap();
        assert!(contents.contains("[index]"));
    }

    #[test]
    fn prints_config_preview() {
        let dir = temp_dir();

        brs_in(dir.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration written:"))
            .stdout(predicate::str::contains("max_query_length"));
    }
}

mod config {
    use super::*;

    #[test]
    fn shows_defaults_without_config() {
        let dir = temp_dir();

        brs_in(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("No configuration files found"))
            .stdout(predicate::str::contains("limit = 50"));
    }

    #[test]
    fn reflects_config_file() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".brs.toml"),
            "root = true\n[search]\nlimit = 7\nscoring = \"frequency\"\n",
        )
        .unwrap();

        brs_in(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("limit = 7"))
            .stdout(predicate::str::contains("frequency"));
    }

    #[test]
    fn warns_about_suspicious_values() {
        let dir = temp_dir();
        fs::write(dir.path().join(".brs.toml"), "root = true\n[search]\nlimit = 0\n").unwrap();

        brs_in(dir.path())
            .arg("config")
            .assert()
            .success()
            .stderr(predicate::str::contains("warning:"));
    }

    #[test]
    fn invalid_toml_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join(".brs.toml"), "[search\nlimit = ").unwrap();

        brs_in(dir.path())
            .arg("config")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod validate {
    use super::*;

    #[test]
    fn accepts_scoped_query() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["validate", "(battery OR cell).ti. AND charg*.ab."])
            .assert()
            .success()
            .stdout(predicate::str::contains("ok"));
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["validate", "(battery.ti. OR cell.ti."])
            .assert()
            .failure()
            .stderr(predicate::str::contains("^"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["validate", "battery.xx."])
            .assert()
            .failure();
    }

    #[test]
    fn inherit_forbids_suffix() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["validate", "--inherit", "battery"])
            .assert()
            .success();
        brs_in(dir.path())
            .args(["validate", "--inherit", "battery.ti."])
            .assert()
            .failure();
    }

    #[test]
    fn empty_default_fields_require_suffix() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".brs.toml"),
            "root = true\n[search]\ndefault_fields = []\n",
        )
        .unwrap();

        brs_in(dir.path())
            .args(["validate", "battery"])
            .assert()
            .failure();
    }
}

mod parse {
    use super::*;

    #[test]
    fn prints_tree_and_token_count() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["parse", "battery.ti. XOR cell.ab."])
            .assert()
            .success()
            .stdout(predicate::str::contains("Parsed AST:"))
            .stdout(predicate::str::contains("XOR"))
            .stdout(predicate::str::contains("battery.ti. XOR cell.ab."))
            .stdout(predicate::str::contains("Token count: 3"));
    }

    #[test]
    fn proximity_becomes_phrase() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["parse", "fast.ab. NEAR2 charging.ab."])
            .assert()
            .success()
            .stdout(predicate::str::contains("slop=2, unordered"));
    }

    #[test]
    fn syntax_error_fails() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["parse", "battery.ti. AND"])
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("error:"));
    }

    #[test]
    fn unclosed_quote_fails() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["parse", "\"fast charging.ti."])
            .assert()
            .failure();
    }
}

mod index {
    use super::*;

    #[test]
    fn missing_file_fails() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["index", "nope.jsonl", "--index", "idx"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to open"));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("bad.jsonl"),
            "{\"id\": \"US-1\", \"title\": \"ok\"}\n{not json\n",
        )
        .unwrap();

        brs_in(dir.path())
            .args(["index", "bad.jsonl", "--index", "idx"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("line 2"));
    }

    #[test]
    fn reads_stdin() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["index", "-", "--index", "idx", "--workers", "1"])
            .write_stdin(PATENTS)
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed 3 documents"));
    }

    #[test]
    fn verbose_logs_to_stderr() {
        let dir = temp_dir();
        fs::write(dir.path().join("patents.jsonl"), PATENTS).unwrap();
        brs_in(dir.path())
            .args(["-v", "index", "patents.jsonl", "--index", "idx", "--workers", "1"])
            .assert()
            .success()
            .stderr(predicate::str::contains("built index"));
    }

    #[test]
    fn rebuild_replaces_documents() {
        let dir = indexed_dir();
        fs::write(
            dir.path().join("one.jsonl"),
            "{\"id\": \"US-9\", \"title\": \"battery pack\"}\n",
        )
        .unwrap();
        brs_in(dir.path())
            .args(["index", "one.jsonl", "--index", "idx", "--workers", "1"])
            .assert()
            .success();

        assert_eq!(search_ids(dir.path(), "battery.ti."), vec!["US-9"]);
    }
}

mod search {
    use super::*;

    #[test]
    fn field_term_matches() {
        let dir = indexed_dir();
        let mut ids = search_ids(dir.path(), "battery.ti.");
        ids.sort();
        assert_eq!(ids, vec!["US-1", "US-2"]);
    }

    #[test]
    fn not_excludes() {
        let dir = indexed_dir();
        assert_eq!(
            search_ids(dir.path(), "battery.ti. NOT solar.ti."),
            vec!["US-1"]
        );
    }

    #[test]
    fn xor_drops_intersection() {
        let dir = indexed_dir();
        assert_eq!(
            search_ids(dir.path(), "battery.ti. XOR lithium.ti."),
            vec!["US-2"]
        );
    }

    #[test]
    fn proximity_and_wildcards() {
        let dir = indexed_dir();
        assert_eq!(
            search_ids(dir.path(), "(fast ADJ charging).ab."),
            vec!["US-1"]
        );
        assert_eq!(search_ids(dir.path(), "brush*.clm."), vec!["US-3"]);
    }

    #[test]
    fn classification_is_case_sensitive() {
        let dir = indexed_dir();
        assert_eq!(search_ids(dir.path(), "H02S40/38.cpc."), vec!["US-2"]);
        assert!(search_ids(dir.path(), "h02s40/38.cpc.").is_empty());
    }

    #[test]
    fn field_prefixes_match_like_suffixes() {
        let dir = indexed_dir();
        assert_eq!(search_ids(dir.path(), "cpc:H02S40/38"), vec!["US-2"]);
        assert_eq!(search_ids(dir.path(), "ti:motor OR ab:motor"), vec!["US-3"]);
    }

    #[test]
    fn default_fields_apply_to_unscoped_terms() {
        let dir = indexed_dir();
        assert_eq!(search_ids(dir.path(), "controller"), vec!["US-3"]);
    }

    #[test]
    fn table_output_lists_ids() {
        let dir = indexed_dir();
        brs_in(dir.path())
            .args(["search", "motor.ti.", "--index", "idx"])
            .assert()
            .success()
            .stdout(predicate::str::contains("US-3"))
            .stdout(predicate::str::contains("Publication"));
    }

    #[test]
    fn no_results_message() {
        let dir = indexed_dir();
        brs_in(dir.path())
            .args(["search", "turbine.ti.", "--index", "idx"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No results found."));
    }

    #[test]
    fn limit_caps_results() {
        let dir = indexed_dir();
        let assert = brs_in(dir.path())
            .args(["search", "battery.ti.", "--index", "idx", "--json", "-n", "1"])
            .assert()
            .success();
        let value: serde_json::Value =
            serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(value["total_matches"], 1);
    }

    #[test]
    fn explain_shows_compiled_query() {
        let dir = indexed_dir();
        brs_in(dir.path())
            .args(["search", "batter*.ti.", "--index", "idx", "--explain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Compiled:"))
            .stdout(predicate::str::contains("ti:batter*"));
    }

    #[test]
    fn scoring_flag_overrides_configuration() {
        let dir = indexed_dir();
        brs_in(dir.path())
            .args([
                "search", "battery.ti.", "--index", "idx", "--explain", "--scoring", "frequency",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("scoring = frequency"));
    }

    #[test]
    fn stopwords_in_plain_text_are_ignored() {
        let dir = indexed_dir();
        assert_eq!(search_ids(dir.path(), "charger for lithium"), vec!["US-1"]);
    }

    #[test]
    fn identifier_lookup_is_rejected() {
        let dir = indexed_dir();
        brs_in(dir.path())
            .args(["search", "id:US-1", "--index", "idx"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("query rejected"));
    }

    #[test]
    fn invalid_query_fails() {
        let dir = indexed_dir();
        brs_in(dir.path())
            .args(["search", "battery.ti. AND AND cell.ti.", "--index", "idx"])
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("error:"));
    }

    #[test]
    fn missing_index_fails() {
        let dir = temp_dir();
        brs_in(dir.path())
            .args(["search", "battery.ti.", "--index", "idx"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to open index"));
    }

    #[test]
    fn configured_index_path_is_used() {
        let dir = indexed_dir();
        fs::write(
            dir.path().join(".brs.toml"),
            "root = true\n[index]\npath = \"idx\"\n",
        )
        .unwrap();

        brs_in(dir.path())
            .args(["search", "motor.ti.", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("US-3"));
    }
}
