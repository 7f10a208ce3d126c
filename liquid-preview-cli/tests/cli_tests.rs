use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Once;
use tempfile::TempDir;
use tracing::{error, info};

static INIT: Once = Once::new();

/// Initialize logging exactly once for all tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    });
}

fn run_cli(dir: &Path, args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_liquid-preview"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run liquid-preview");

    if output.status.success() {
        info!("Command executed successfully");
    } else {
        error!("Command failed with status: {}", output.status);
    }
    info!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    output
}

fn project() -> TempDir {
    init_logging();
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("liquid")).unwrap();
    fs::create_dir_all(root.path().join("src").join("sample-data")).unwrap();
    fs::write(
        root.path().join("liquid").join("list.liquid"),
        "{% for item in target.items %}[{{ item.title }}]{% endfor %}",
    )
    .unwrap();
    fs::write(
        root.path().join("liquid").join("post.liquid"),
        "<h1>{{ Target.title }}</h1>",
    )
    .unwrap();
    root
}

fn sample(root: &TempDir, name: &str, json: &str) {
    fs::write(root.path().join("src").join("sample-data").join(name), json).unwrap();
}

#[test]
fn test_help_exits_successfully() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();

    let output = run_cli(dir.path(), &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("detail_liquid_file"));
}

#[test]
fn test_missing_templates_directory() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();

    let output = run_cli(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("templates directory not found"));
}

#[test]
fn test_render_single_file() {
    let root = project();
    sample(
        &root,
        "posts.json",
        r#"{"liquid_file": "list", "Target": {"Items": [
            {"Title": "One", "detail_liquid_file": "post", "RoutePath": "one"},
            {"Title": "Two"}
        ]}}"#,
    );
    sample(&root, "other.json", r#"{"liquid_file": "list"}"#);

    let output = run_cli(root.path(), &["src/sample-data/posts.json"]);
    assert!(output.status.success());

    let html = root.path().join("html");
    assert_eq!(
        fs::read_to_string(html.join("posts.html")).unwrap(),
        "[One][Two]"
    );
    assert_eq!(
        fs::read_to_string(html.join("one.html")).unwrap(),
        "<h1>One</h1>"
    );
    assert!(!html.join("other.html").exists());
}

#[test]
fn test_missing_sample_file() {
    let root = project();

    let output = run_cli(root.path(), &["src/sample-data/nope.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Sample data file not found"));
    assert!(!root.path().join("html").exists());
}

#[test]
fn test_single_file_failure() {
    let root = project();
    sample(&root, "broken.json", r#"{"Target": {}}"#);

    let output = run_cli(root.path(), &["src/sample-data/broken.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("liquid_file"));
}

#[test]
fn test_batch_with_failure() {
    let root = project();
    sample(&root, "a.json", r#"{"liquid_file": "list", "Target": {"Items": [{"Title": "A"}]}}"#);
    sample(&root, "b.json", r#"{"liquid_file": "missing"}"#);
    sample(&root, "c.json", r#"{"liquid_file": "list", "Target": {"Items": [{"Title": "C"}]}}"#);
    sample(&root, "Menus.JSON", r#"{"menus": []}"#);

    let output = run_cli(root.path(), &["--all", "--output", "site"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 failure(s)"));

    let site = root.path().join("site");
    assert_eq!(fs::read_to_string(site.join("a.html")).unwrap(), "[A]");
    assert_eq!(fs::read_to_string(site.join("c.html")).unwrap(), "[C]");
    assert!(!site.join("b.html").exists());
    assert!(!site.join("Menus.html").exists());
}

#[test]
fn test_batch_without_sample_files() {
    let root = project();
    sample(&root, "menus.json", r#"{"menus": []}"#);

    let output = run_cli(root.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!root.path().join("html").exists());
}

#[test]
fn test_batch_from_subdirectory() {
    let root = project();
    sample(&root, "posts.json", r#"{"liquid_file": "list", "Target": {"Items": []}}"#);
    let nested = root.path().join("src").join("sample-data");

    let output = run_cli(&nested, &["-a", "-v"]);
    assert!(output.status.success());
    assert!(root.path().join("html").join("posts.html").exists());
}
