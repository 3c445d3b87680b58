//! Integration tests for listing through the public library API

use async_trait::async_trait;
use std::fs::{self, File};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};
use taskr::list::{ListOptions, ListOutcome, Lister, StatusOptions, StatusOracle};
use taskr::{Task, Taskfile, TimestampOracle};
use tempfile::TempDir;

fn write_at(path: &Path, age: Duration) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "x").unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - age)
        .unwrap();
}

fn json_options() -> ListOptions {
    ListOptions {
        all: true,
        json: true,
        concurrency: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_timestamp_status_in_json_listing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(
        root.join("Taskfile.yml"),
        "\
version: '3'
tasks:
  build:
    sources: ['src/**/*.rs']
    generates: [target/app]
    cmd: cargo build
  web:
    dir: web
    method: none
    sources: ['*.ts']
    cmd: npm run build
  test:
    sources: ['tests/*.rs']
    generates: [target/report]
    cmd: cargo test
",
    )
    .unwrap();
    write_at(&root.join("src/main.rs"), Duration::from_secs(300));
    write_at(&root.join("target/app"), Duration::from_secs(60));
    write_at(&root.join("web/app.ts"), Duration::from_secs(300));
    write_at(&root.join("tests/cli.rs"), Duration::from_secs(10));
    write_at(&root.join("target/report"), Duration::from_secs(100));

    let taskfile = Taskfile::load(root.join("Taskfile.yml")).unwrap();
    let oracle = TimestampOracle::new(taskfile.dir());
    let mut output = Vec::new();

    let outcome = Lister::new(&taskfile)
        .with_oracle(&oracle)
        .with_dry(true)
        .list_tasks(&json_options(), &mut output)
        .await
        .unwrap();
    assert_eq!(outcome, ListOutcome::Listed);

    let document: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let status = |name: &str| {
        document["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .find(|task| task["task"] == name)
            .map(|task| task["upToDate"].clone())
            .unwrap()
    };
    assert_eq!(status("build"), true);
    // the task's own method wins over the Taskfile default
    assert_eq!(status("web"), false);
    assert_eq!(status("test"), false);

    let location = &document["tasks"][0]["location"];
    assert_eq!(location["line"], 3);
    assert_eq!(location["column"], 3);
}

struct CountingOracle {
    calls: AtomicUsize,
}

#[async_trait]
impl StatusOracle for CountingOracle {
    async fn is_up_to_date(&self, task: &Task, options: &StatusOptions) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(options.method == "checksum" && task.desc.is_empty())
    }
}

#[tokio::test]
async fn test_custom_oracle_sees_taskfile_method() {
    let taskfile = Taskfile::parse(
        "method: checksum\ntasks:\n  a: echo a\n  b:\n    desc: B\n    cmd: echo b\n  c:\n    internal: true\n    cmd: echo c\n",
        "Taskfile.yml",
    )
    .unwrap();
    let oracle = CountingOracle {
        calls: AtomicUsize::new(0),
    };
    let mut output = Vec::new();

    Lister::new(&taskfile)
        .with_oracle(&oracle)
        .list_tasks(&json_options(), &mut output)
        .await
        .unwrap();

    // internal tasks are never checked
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
    let document: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(document["tasks"][0]["upToDate"], true);
    assert_eq!(document["tasks"][1]["upToDate"], false);
}

#[tokio::test]
async fn test_table_listing_never_checks_status() {
    let taskfile = Taskfile::parse("tasks:\n  a:\n    desc: A\n    cmd: echo a\n", "Taskfile.yml").unwrap();
    let oracle = CountingOracle {
        calls: AtomicUsize::new(0),
    };
    let mut output = Vec::new();

    let options = ListOptions {
        only_described: true,
        ..Default::default()
    };
    Lister::new(&taskfile)
        .with_oracle(&oracle)
        .list_tasks(&options, &mut output)
        .await
        .unwrap();

    assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    assert_eq!(String::from_utf8(output).unwrap(), "\nGENERAL\na    A\n");
}

#[tokio::test]
async fn test_unbounded_concurrency_setting() {
    let taskfile = Taskfile::parse("tasks:\n  a: echo a\n  b: echo b\n", "Taskfile.yml").unwrap();
    let oracle = CountingOracle {
        calls: AtomicUsize::new(0),
    };
    let mut output = Vec::new();

    let options = ListOptions {
        concurrency: usize::MAX,
        ..json_options()
    };
    let outcome = Lister::new(&taskfile)
        .with_oracle(&oracle)
        .list_tasks(&options, &mut output)
        .await
        .unwrap();

    assert_eq!(outcome, ListOutcome::Listed);
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
}
