use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const TEMPLATE: &str = r#"<div id="app"><h1 v-text="title"></h1><p>{{counter}}</p><div v-html="body"></div></div>"#;

fn write_inputs(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(dir.join("page.html"), TEMPLATE)?;
    fs::write(
        dir.join("data.json"),
        r#"{ "title": "Hello", "counter": 1, "body": "<b>hi</b>" }"#,
    )?;
    Ok(())
}

#[test]
fn render_prints_mounted_markup() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("bindery")?
        .current_dir(dir.path())
        .args(["render", "--template", "page.html", "--data", "data.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<h1 v-text="title">Hello</h1><p>1</p><div v-html="body"><b>hi</b></div>"#,
        ));
    Ok(())
}

#[test]
fn render_applies_writes_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("bindery")?
        .current_dir(dir.path())
        .args([
            "render",
            "--template",
            "page.html",
            "--data",
            "data.json",
            "--set",
            "counter=2",
            "--set",
            "counter=5",
            "--set",
            "title=Bye",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>5</p>"))
        .stdout(predicate::str::contains(r#"<h1 v-text="title">Bye</h1>"#));
    Ok(())
}

#[test]
fn render_rejects_unknown_key() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("bindery")?
        .current_dir(dir.path())
        .args([
            "render",
            "--template",
            "page.html",
            "--data",
            "data.json",
            "--set",
            "missing=1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key: missing"));
    Ok(())
}

#[test]
fn render_uses_config_selector() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("page.html"),
        r#"<p>{{n}}</p><main><p>{{n}}</p></main>"#,
    )?;
    fs::write(dir.path().join("data.json"), r#"{"n": 7}"#)?;
    fs::write(dir.path().join("bindery.yml"), "selector: main\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("bindery")?
        .current_dir(dir.path())
        .args([
            "render",
            "--template",
            "page.html",
            "--data",
            "data.json",
            "--config",
            "bindery.yml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>{{n}}</p><main><p>7</p></main>"));
    Ok(())
}

#[test]
fn render_reports_missing_root() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("bindery")?
        .current_dir(dir.path())
        .args([
            "render",
            "--template",
            "page.html",
            "--data",
            "data.json",
            "--selector",
            "#nowhere",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to mount template"));
    Ok(())
}

#[test]
fn bindings_lists_sinks_and_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("bindery")?
        .current_dir(dir.path())
        .args(["bindings", "--template", "page.html", "--data", "data.json"])
        .assert()
        .success()
        .stdout("text title\ntext counter\nhtml body\n");
    Ok(())
}

#[test]
fn bindings_json_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("bindery")?
        .current_dir(dir.path())
        .args([
            "bindings",
            "--template",
            "page.html",
            "--data",
            "data.json",
            "--json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    let arr = value.as_array().expect("json array");
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[1]["directive"], "text");
    assert_eq!(arr[1]["path"], "counter");
    assert_eq!(arr[2]["directive"], "html");
    Ok(())
}
