// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write file");
}

/// Temp workspace with a dummy-provider config and two images.
fn setup() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    write_file(
        &dir.path().join("btembed.toml"),
        br#"
progress = false

[embeddings]
provider = "dummy"
dimension = 8
"#,
    );
    write_file(&dir.path().join("images").join("cat.jpg"), b"cat-bytes");
    write_file(&dir.path().join("images").join("dog.jpg"), b"dog-bytes");
    dir
}

fn btembed(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("btembed"));
    cmd.current_dir(dir)
        .env_remove("BTEMBED_PROVIDER")
        .env_remove("BTEMBED_PROGRESS")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(dir.join("btembed.toml"));
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run btembed");
    assert!(
        output.status.success(),
        "btembed failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

#[test]
fn pairs_from_manifest_return_one_vector_per_pair() {
    let dir = setup();
    write_file(
        &dir.path().join("pairs.json"),
        br#"[
            {"text": "a cat", "image": "images/cat.jpg"},
            {"transcript": "a dog", "extracted_frame_path": "images/dog.jpg"}
        ]"#,
    );

    let value = json_stdout(btembed(dir.path()).args([
        "--format",
        "json",
        "pairs",
        "--manifest",
        "pairs.json",
    ]));

    let vectors = value.as_array().expect("array of vectors");
    assert_eq!(vectors.len(), 2);
    assert!(vectors
        .iter()
        .all(|v| v.as_array().map(|a| a.len()) == Some(8)));
    assert_ne!(vectors[0], vectors[1]);
}

#[test]
fn inline_pairs_match_manifest_pairs() {
    let dir = setup();
    write_file(
        &dir.path().join("pairs.json"),
        br#"[{"text": "a cat", "image": "images/cat.jpg"}]"#,
    );

    let from_manifest = json_stdout(btembed(dir.path()).args([
        "--format",
        "json",
        "pairs",
        "--manifest",
        "pairs.json",
    ]));
    let inline = json_stdout(btembed(dir.path()).args([
        "--format",
        "json",
        "pairs",
        "--text",
        "a cat",
        "--image",
        "images/cat.jpg",
    ]));

    assert_eq!(from_manifest, inline);
}

#[test]
fn mismatched_pairs_fail_with_precondition_error() {
    let dir = setup();
    btembed(dir.path())
        .args([
            "pairs", "--text", "a", "--text", "b", "--image", "images/cat.jpg",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "the number of texts (2) must equal the number of images (1)",
        ));
}

#[test]
fn missing_image_aborts_the_batch() {
    let dir = setup();
    btembed(dir.path())
        .args([
            "pairs",
            "--text",
            "a cat",
            "--image",
            "images/cat.jpg",
            "--text",
            "a ghost",
            "--image",
            "images/ghost.jpg",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ghost.jpg"));
}

#[test]
fn query_equals_single_document() {
    let dir = setup();
    let query = json_stdout(btembed(dir.path()).args(["--format", "json", "query", "hello"]));
    let documents =
        json_stdout(btembed(dir.path()).args(["--format", "json", "documents", "hello"]));

    assert_eq!(Some(&query), documents.as_array().and_then(|d| d.first()));
}

#[test]
fn documents_text_output_lists_each_vector() {
    let dir = setup();
    btembed(dir.path())
        .args(["documents", "first", "second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 dim=8 ["))
        .stdout(predicate::str::contains("1 dim=8 ["));
}

#[test]
fn env_override_selects_provider() {
    let dir = setup();
    write_file(&dir.path().join("btembed.toml"), b"progress = false\n");

    let mut cmd = btembed(dir.path());
    cmd.env("BTEMBED_PROVIDER", "dummy")
        .args(["--format", "json", "query", "hello"]);
    let value = json_stdout(&mut cmd);
    assert_eq!(value.as_array().map(|a| a.len()), Some(512));
}

#[test]
fn unknown_command_provider_is_reported() {
    let dir = setup();
    write_file(
        &dir.path().join("btembed.toml"),
        br#"
[embeddings]
provider = "command"
command = "definitely-not-a-real-embedder-binary"
"#,
    );

    btembed(dir.path())
        .args(["query", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found on PATH"));
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().expect("tempdir");
    Command::new(assert_cmd::cargo::cargo_bin!("btembed"))
        .current_dir(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("btembed"));
}
