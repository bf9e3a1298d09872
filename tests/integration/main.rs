//! Integration tests for vutil

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn vutil(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("vutil");
        // Keep config, state, and cache inside the test sandbox.
        cmd.env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path().join(".config"))
            .env("XDG_STATE_HOME", home.path().join(".state"))
            .env_remove("VUTIL_CONFIG")
            .arg("--no-local");
        cmd
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        vutil(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Vuetify utility-class extractor"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        vutil(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("vutil"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        vutil(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        vutil(&home)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn config_set_rejects_unknown_key() {
        let home = TempDir::new().unwrap();
        vutil(&home)
            .args(["config", "set", "bogus.key", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown configuration key"));
    }

    #[test]
    fn init_creates_local_config() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        vutil(&home)
            .args(["init", "--path"])
            .arg(project.path())
            .assert()
            .success();

        assert!(project.path().join(".vutil.toml").is_file());
    }

    #[test]
    fn list_unknown_category_fails() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        vutil(&home)
            .args(["list", "--category", "bogus"])
            .arg(project.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown category"));
    }

    #[test]
    fn cache_info_empty() {
        let home = TempDir::new().unwrap();
        vutil(&home)
            .args(["cache", "info"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached entries"));
    }
}

mod extraction_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const SAMPLE_CSS: &str = "\
.ma-2 { margin: 8px !important }\n\
.d-flex { display: flex !important }\n\
.pa-4 { padding: 16px !important }\n\
.foo .bar { color: red }\n\
.v-btn::before { content: '' }\n";

    fn install_vuetify(root: &Path, version: &str) {
        let pkg = root.join("node_modules/vuetify");
        fs::create_dir_all(pkg.join("dist")).unwrap();
        fs::write(
            pkg.join("package.json"),
            format!(r#"{{"name": "vuetify", "version": "{}"}}"#, version),
        )
        .unwrap();
        fs::write(pkg.join("dist/vuetify.css"), SAMPLE_CSS).unwrap();
    }

    fn vutil(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("vutil");
        cmd.env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path().join(".config"))
            .env("XDG_STATE_HOME", home.path().join(".state"))
            .env_remove("VUTIL_CONFIG")
            .arg("--no-local");
        cmd
    }

    #[test]
    fn two_roots_one_installed() {
        let home = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let with_vuetify = workspace.path().join("app");
        let without = workspace.path().join("docs");
        fs::create_dir_all(&with_vuetify).unwrap();
        fs::create_dir_all(&without).unwrap();
        install_vuetify(&with_vuetify, "3.1.0");

        vutil(&home)
            .arg("extract")
            .arg(&with_vuetify)
            .arg(&without)
            .assert()
            .success()
            .stdout(predicate::str::contains("app"))
            .stdout(predicate::str::contains("Total: 3 record(s) across 1 root(s)"))
            .stdout(predicate::str::contains("docs").not())
            .stderr(predicate::str::contains("No vuetify installation detected"))
            .stderr(predicate::str::contains("docs"));
    }

    #[test]
    fn extract_is_repeatable() {
        let home = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let root = workspace.path().join("app");
        fs::create_dir_all(&root).unwrap();
        install_vuetify(&root, "3.1.0");

        let first = vutil(&home).arg("extract").arg(&root).assert().success();
        let first_stdout = String::from_utf8_lossy(&first.get_output().stdout).to_string();

        // Second run hits the durable cache and reports the same index.
        let second = vutil(&home).arg("extract").arg(&root).assert().success();
        let second_stdout = String::from_utf8_lossy(&second.get_output().stdout).to_string();

        assert_eq!(first_stdout, second_stdout);
    }

    #[test]
    fn list_reports_records_and_descriptions() {
        let home = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let root = workspace.path().join("app");
        fs::create_dir_all(&root).unwrap();
        install_vuetify(&root, "3.1.0");

        vutil(&home)
            .arg("list")
            .arg(&root)
            .assert()
            .success()
            .stdout(predicate::str::contains("ma-2"))
            .stdout(predicate::str::contains("d-flex"))
            .stdout(predicate::str::contains("pa-4"))
            .stdout(predicate::str::contains("Apply padding 4 on all sides"))
            .stdout(predicate::str::contains("foo").not())
            .stdout(predicate::str::contains("v-btn").not());
    }

    #[test]
    fn list_json_is_parseable() {
        let home = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let root = workspace.path().join("app");
        fs::create_dir_all(&root).unwrap();
        install_vuetify(&root, "3.1.0");

        let assert = vutil(&home)
            .args(["list", "-f", "json"])
            .arg(&root)
            .assert()
            .success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        let records: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        let names: Vec<&str> = records
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["ma-2", "d-flex", "pa-4"]);
    }

    #[test]
    fn list_filters_by_category() {
        let home = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let root = workspace.path().join("app");
        fs::create_dir_all(&root).unwrap();
        install_vuetify(&root, "3.1.0");

        vutil(&home)
            .args(["list", "--category", "spacing", "-f", "plain"])
            .arg(&root)
            .assert()
            .success()
            .stdout(predicate::str::contains("ma-2"))
            .stdout(predicate::str::contains("pa-4"))
            .stdout(predicate::str::contains("d-flex").not());
    }

    #[test]
    fn cache_info_and_clear_roundtrip() {
        let home = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let root = workspace.path().join("app");
        fs::create_dir_all(&root).unwrap();
        install_vuetify(&root, "3.1.0");

        vutil(&home).arg("extract").arg(&root).assert().success();

        vutil(&home)
            .args(["cache", "info"])
            .assert()
            .success()
            .stdout(predicate::str::contains("3.1.0"));

        vutil(&home)
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 1"));

        vutil(&home)
            .args(["cache", "info"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached entries"));
    }

    #[test]
    fn no_installation_reports_empty() {
        let home = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let root = workspace.path().join("plain");
        fs::create_dir_all(&root).unwrap();

        vutil(&home)
            .arg("extract")
            .arg(&root)
            .assert()
            .success()
            .stdout(predicate::str::contains("No vuetify installations found"))
            .stderr(predicate::str::contains("No vuetify installation detected"));
    }

    #[test]
    fn notification_suppressed_by_config() {
        let home = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let root = workspace.path().join("plain");
        fs::create_dir_all(&root).unwrap();

        vutil(&home)
            .args(["config", "set", "notifications.not_detected", "false"])
            .assert()
            .success();

        vutil(&home)
            .arg("extract")
            .arg(&root)
            .assert()
            .success()
            .stderr(predicate::str::contains("No vuetify installation detected").not());
    }
}
