// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line round trips against a temporary store file.
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn envprefs(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("envprefs").unwrap();
    cmd.env("ENVPREFS_STORE", dir.path().join("prefs.json"));
    cmd
}

#[test]
fn set_then_get_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    envprefs(&dir)
        .args(["set", "prod", "sidebar", r#"{"width":320}"#])
        .assert()
        .success();
    envprefs(&dir)
        .args(["get", "prod", "sidebar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"width\": 320"));
    envprefs(&dir)
        .args(["get", "staging", "sidebar"])
        .assert()
        .failure();
}

#[test]
fn recents_move_to_front() {
    let dir = tempfile::tempdir().unwrap();
    for ns in ["kube-system", "default", "kube-system"] {
        envprefs(&dir)
            .args(["recent", "add", "e1", "--k8s", "namespace", ns])
            .assert()
            .success();
    }
    envprefs(&dir)
        .args(["recent", "list", "e1", "--k8s", "namespace"])
        .assert()
        .success()
        .stdout("kube-system\ndefault\n");
}

#[test]
fn recent_target_is_required() {
    let dir = tempfile::tempdir().unwrap();
    envprefs(&dir).args(["recent", "list", "e1"]).assert().failure();
    envprefs(&dir)
        .args(["recent", "list", "e1", "--url", "--k8s", "pod"])
        .assert()
        .failure();
}

#[test]
fn history_dedupes_and_cleanup_removes_keys() {
    let dir = tempfile::tempdir().unwrap();
    for ts in ["1", "2"] {
        envprefs(&dir)
            .args([
                "history",
                "add",
                "e1",
                "--image",
                "trace_exec",
                "--params",
                r#"{"ns":"default"}"#,
                "--timestamp",
                ts,
            ])
            .assert()
            .success();
    }
    envprefs(&dir)
        .args(["history", "list", "e1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"timestamp\": 2")
                .and(predicate::str::contains("\"timestamp\": 1").not()),
        );

    envprefs(&dir)
        .args(["recent", "add", "e1", "--url", "ghcr.io/x"])
        .assert()
        .success();
    envprefs(&dir)
        .args(["keys", "e1"])
        .assert()
        .success()
        .stdout("env:e1:gadget-history\nenv:e1:gadget-url-recent\n");
    envprefs(&dir)
        .args(["cleanup", "e1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 2 keys"));
    envprefs(&dir).args(["keys", "e1"]).assert().success().stdout("");
}
