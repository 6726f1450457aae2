// Integration tests for the kubescore CLI.
//
// Each test runs the binary from an empty temp dir with HOME pointed at it,
// so no stray kubescore.toml can leak into the run.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn kubescore(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kubescore").expect("binary should exist");
    cmd.current_dir(home.path()).env("HOME", home.path());
    cmd
}

/// Runs `score --format json` and returns the parsed scorecard.
fn score_json(fixtures: &[&str], extra: &[&str]) -> Value {
    let home = TempDir::new().expect("temp dir should be created");
    let mut cmd = kubescore(&home);
    cmd.arg("score").arg("--format").arg("json").args(extra);
    for name in fixtures {
        cmd.arg(fixture(name));
    }
    let output = cmd.output().expect("binary should run");
    serde_json::from_slice(&output.stdout).expect("stdout should be a json scorecard")
}

fn check<'a>(scorecard: &'a Value, object: usize, id: &str) -> Option<&'a Value> {
    scorecard["objects"][object]["scores"]
        .as_array()
        .expect("scores array")
        .iter()
        .find(|score| score["check"] == id)
}

fn has_comment(score: &Value, summary: &str, description: &str) -> bool {
    score["comments"]
        .as_array()
        .expect("comments array")
        .iter()
        .any(|comment| {
            comment["path"] == "foobar"
                && comment["summary"] == summary
                && comment["description"] == description
        })
}

const NO_CONTEXT: (&str, &str) = (
    "Container has no configured security context",
    "Set securityContext to run the container in a more secure context.",
);

#[test]
fn cli_version_flag() {
    let home = TempDir::new().expect("temp dir should be created");
    kubescore(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kubescore"));
}

#[test]
fn score_requires_paths() {
    let home = TempDir::new().expect("temp dir should be created");
    kubescore(&home)
        .arg("score")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn list_prints_checks_in_registration_order() {
    let home = TempDir::new().expect("temp dir should be created");
    kubescore(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "container-security-context-user-group-id,Container Security Context User Group ID,default\n",
        ))
        .stdout(predicate::str::contains(
            "container-security-context,Container Security Context,optional",
        ));
}

#[test]
fn combined_security_context_all_good_has_no_comments() {
    let card = score_json(
        &["pod-security-context-all-good.yaml"],
        &["--enable-optional-test", "container-security-context"],
    );
    let score = check(&card, 0, "container-security-context").expect("check should run");
    assert_eq!(score["grade"], "ok");
    assert_eq!(score["comments"].as_array().map(Vec::len), Some(0));
}

#[test]
fn combined_security_context_flags_each_violation() {
    let cases = [
        (
            "pod-security-context-privileged.yaml",
            "The container is privileged",
            "Set securityContext.privileged to false. Privileged containers can access all devices on the host, and grants almost the same access as non-containerized processes on the host.",
        ),
        (
            "pod-security-context-low-user-id.yaml",
            "The container is running with a low user ID",
            "A userid above 10 000 is recommended to avoid conflicts with the host. Set securityContext.runAsUser to a value > 10000",
        ),
        (
            "pod-security-context-low-group-id.yaml",
            "The container running with a low group ID",
            "A groupid above 10 000 is recommended to avoid conflicts with the host. Set securityContext.runAsGroup to a value > 10000",
        ),
        (
            "pod-security-context-writeablerootfilesystem.yaml",
            "The pod has a container with a writable root filesystem",
            "Set securityContext.readOnlyRootFilesystem to true",
        ),
        ("pod-security-context-nosecuritycontext.yaml", NO_CONTEXT.0, NO_CONTEXT.1),
    ];

    for (file, summary, description) in cases {
        let card = score_json(&[file], &["--enable-optional-test", "container-security-context"]);
        let score = check(&card, 0, "container-security-context").expect("check should run");
        assert_eq!(score["grade"], "critical", "{file}");
        assert!(has_comment(score, summary, description), "{file}");
    }
}

#[test]
fn pod_security_context_is_inherited() {
    let card = score_json(
        &["security-inherit-pod-security-context.yaml"],
        &["--enable-optional-test", "container-security-context"],
    );
    let score = check(&card, 0, "container-security-context").expect("check should run");
    assert_eq!(score["grade"], "ok");
}

#[test]
fn sub_checks_report_their_own_findings() {
    let card = score_json(&["pod-security-context-low-group-id.yaml"], &[]);
    let ids = check(&card, 0, "container-security-context-user-group-id").expect("default check");
    assert_eq!(ids["grade"], "critical");
    assert!(has_comment(
        ids,
        "The container running with a low group ID",
        "A groupid above 10 000 is recommended to avoid conflicts with the host. Set securityContext.runAsGroup to a value > 10000"
    ));
    let privileged = check(&card, 0, "container-security-context-privileged").expect("default check");
    assert_eq!(privileged["grade"], "ok");

    let card = score_json(&["pod-security-context-nosecuritycontext.yaml"], &[]);
    for id in [
        "container-security-context-user-group-id",
        "container-security-context-readonlyrootfilesystem",
    ] {
        let score = check(&card, 0, id).expect("default check");
        assert_eq!(score["grade"], "critical", "{id}");
        assert!(has_comment(score, NO_CONTEXT.0, NO_CONTEXT.1), "{id}");
    }

    let card = score_json(&["pod-security-context-all-good.yaml"], &[]);
    for id in [
        "container-security-context-user-group-id",
        "container-security-context-privileged",
        "container-security-context-readonlyrootfilesystem",
    ] {
        let score = check(&card, 0, id).expect("default check");
        assert_eq!(score["grade"], "ok", "{id}");
        assert_eq!(score["comments"].as_array().map(Vec::len), Some(0), "{id}");
    }
}

#[test]
fn optional_check_absent_unless_enabled() {
    let card = score_json(&["pod-security-context-all-good.yaml"], &[]);
    assert!(check(&card, 0, "container-security-context").is_none());
}

#[test]
fn seccomp_profile_check_grades_warning_when_missing() {
    let enable = ["--enable-optional-test", "container-seccomp-profile"];
    let card = score_json(&["pod-seccomp-no-annotation.yaml"], &enable);
    let score = check(&card, 0, "container-seccomp-profile").expect("check should run");
    assert_eq!(score["grade"], "warning");

    let card = score_json(&["pod-seccomp-annotated.yaml"], &enable);
    let score = check(&card, 0, "container-seccomp-profile").expect("check should run");
    assert_eq!(score["grade"], "ok");
}

#[test]
fn seccomp_profile_check_is_version_gated() {
    let card = score_json(
        &["pod-seccomp-no-annotation.yaml"],
        &[
            "--enable-optional-test",
            "container-seccomp-profile",
            "--kubernetes-version",
            "1.18",
        ],
    );
    assert!(check(&card, 0, "container-seccomp-profile").is_none());
}

#[test]
fn missing_service_account_fails_closed() {
    let card = score_json(&["deployment-missing-service-account.yaml"], &[]);
    let score = check(&card, 0, "pod-serviceaccount").expect("check should run");
    assert_eq!(score["grade"], "critical");
    assert_eq!(score["comments"][0]["path"], "spec.serviceAccountName");
}

#[test]
fn runs_are_byte_identical() {
    let files = ["hardened.yaml", "pod-security-context-privileged.yaml"];
    let first = score_json(&files, &["--enable-optional-test", "container-security-context"]);
    let second = score_json(
        &files,
        &[
            "--enable-optional-test",
            "container-security-context",
            "--sequential",
        ],
    );
    assert_eq!(first, second);
}

#[test]
fn exit_code_follows_grades() {
    let home = TempDir::new().expect("temp dir should be created");
    kubescore(&home)
        .arg("score")
        .arg(fixture("hardened.yaml"))
        .assert()
        .code(0);

    kubescore(&home)
        .arg("score")
        .arg(fixture("pod-security-context-privileged.yaml"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[CRITICAL] Container Security Context Privileged"));
}

#[test]
fn exit_one_on_warning_is_opt_in() {
    let home = TempDir::new().expect("temp dir should be created");
    let args = [
        "--enable-optional-test",
        "container-seccomp-profile",
        "--ignore-test",
        "container-security-context-user-group-id",
        "--ignore-test",
        "container-security-context-readonlyrootfilesystem",
        "--ignore-test",
        "pod-networkpolicy",
    ];

    kubescore(&home)
        .arg("score")
        .args(args)
        .arg(fixture("pod-seccomp-no-annotation.yaml"))
        .assert()
        .code(0);

    kubescore(&home)
        .arg("score")
        .args(args)
        .arg("--exit-one-on-warning")
        .arg(fixture("pod-seccomp-no-annotation.yaml"))
        .assert()
        .code(1);
}

#[test]
fn malformed_version_is_a_runtime_failure() {
    let home = TempDir::new().expect("temp dir should be created");
    kubescore(&home)
        .args(["score", "--kubernetes-version", "latest"])
        .arg(fixture("hardened.yaml"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid kubernetes version"));
}

#[test]
fn unknown_optional_check_is_rejected() {
    let home = TempDir::new().expect("temp dir should be created");
    kubescore(&home)
        .args(["score", "--enable-optional-test", "no-such-check"])
        .arg(fixture("hardened.yaml"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown check identifier"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn project_config_enables_optional_checks() {
    let home = TempDir::new().expect("temp dir should be created");
    fs::write(
        home.path().join("kubescore.toml"),
        r#"
[run]
enabled_optional_tests = ["container-security-context"]

[output]
format = "json"
"#,
    )
    .expect("config should write");

    let output = kubescore(&home)
        .arg("score")
        .arg(fixture("pod-security-context-all-good.yaml"))
        .output()
        .expect("binary should run");
    let card: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert!(check(&card, 0, "container-security-context").is_some());
}

#[test]
fn sarif_output_reports_critical_findings_as_errors() {
    let home = TempDir::new().expect("temp dir should be created");
    let output = kubescore(&home)
        .args(["score", "--format", "sarif"])
        .arg(fixture("pod-security-context-privileged.yaml"))
        .output()
        .expect("binary should run");
    let sarif: Value = serde_json::from_slice(&output.stdout).expect("sarif output");
    let results = sarif["runs"][0]["results"].as_array().expect("results array");
    assert!(results.iter().any(|result| {
        result["ruleId"] == "container-security-context-privileged" && result["level"] == "error"
    }));
}

#[test]
fn stdin_input_is_supported() {
    let home = TempDir::new().expect("temp dir should be created");
    let manifest =
        fs::read_to_string(fixture("hardened.yaml")).expect("fixture should be readable");
    kubescore(&home)
        .args(["score", "-"])
        .write_stdin(manifest)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("apps/v1/Deployment web in shop [OK] (-:1)"));
}
