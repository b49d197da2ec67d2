use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_scan_reports_unresolved_text() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", "const title = '远程开门';\n")?;

    let (code, stdout, _) = run(test.scan_command())?;
    assert_eq!(code, 1);
    assert_eq!(
        stdout,
        "\
error: \"远程开门\"  string-variable
  --> src/main.ts:1:16
  |
1 | const title = '远程开门';
  |                ^^^^^^^^

✘ 1 problem (1 error, 0 warnings)
"
    );

    Ok(())
}

#[test]
fn test_scan_resolved_text_is_warning() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", "const title = '确定';\n")?;
    test.write_file("src/locales/zh.json", r#"{"common": {"ok": "确定"}}"#)?;

    let (code, stdout, _) = run(test.scan_command())?;
    assert_eq!(code, 0);
    assert!(stdout.contains("warning: \"确定\""));
    assert!(stdout.contains("= note: key exists, replace with t('common.ok')"));
    assert!(stdout.contains("1 text already in a dictionary"));

    Ok(())
}

#[test]
fn test_scan_clean_project() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", "export const answer = 42;\n")?;

    let (code, stdout, _) = run(test.scan_command())?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ Scanned 1 source file - no hard-coded text found\n");

    Ok(())
}

#[test]
fn test_scan_vue_template() -> Result<()> {
    let test = CliTest::with_file(
        "src/App.vue",
        r#"<template>
  <i title="远程开门">{{ '确定' }}</i>
</template>
"#,
    )?;

    let (code, stdout, _) = run(test.scan_command())?;
    assert_eq!(code, 1);
    assert!(stdout.contains("markup-attribute"));
    assert!(stdout.contains("--> src/App.vue:2:13"));
    assert!(stdout.contains("interpolation-expression"));

    Ok(())
}

#[test]
fn test_scan_json_output() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", "const tip = { label: '开门' };\n")?;
    test.write_file(".tolkrc.json", r#"{ "propertyNames": ["label"] }"#)?;

    let (_, stdout, _) = run({
        let mut cmd = test.scan_command();
        cmd.arg("--json");
        cmd
    })?;
    let parsed: Value = serde_json::from_str(&stdout)?;
    let candidates = parsed.as_array().expect("array of candidates");

    let property = candidates
        .iter()
        .find(|c| c["context"] == "object-property")
        .expect("object-property candidate");
    assert_eq!(property["text"], "开门");
    assert_eq!(property["contextMeta"], "label");
    assert_eq!(property["sourceFile"], "src/main.ts");

    Ok(())
}

#[test]
fn test_scan_skips_dictionary_files() -> Result<()> {
    let test = CliTest::with_file("src/main.js", "export const ok = 1;\n")?;
    test.write_file(".tolkrc.json", r#"{ "languages": [{ "code": "zh", "file": "src/locales/zh.js" }] }"#)?;
    test.write_file("src/locales/zh.js", "export default { ok: '确定' };\n")?;

    let (code, stdout, _) = run(test.scan_command())?;
    assert_eq!(code, 0, "{}", stdout);

    Ok(())
}

#[test]
fn test_scan_invalid_config() -> Result<()> {
    let test = CliTest::with_file(".tolkrc.json", r#"{ "quote": "`" }"#)?;

    let (code, _, stderr) = run(test.scan_command())?;
    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error: Invalid 'quote'"));

    Ok(())
}
