use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, run};

const SOURCE: &str = "const title = '远程开门';\nconst ok = '确定';\n";
const ZH: &str = r#"{"common": {"ok": "确定"}}"#;

/// The key `text` was stored under at the top level of a JSON dictionary.
fn key_of(dictionary: &str, text: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(dictionary).ok()?;
    parsed
        .as_object()?
        .iter()
        .find(|(_, value)| value.as_str() == Some(text))
        .map(|(key, _)| key.clone())
}

#[test]
fn test_extract_dry_run_changes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", SOURCE)?;
    test.write_file("src/locales/zh.json", ZH)?;

    let (code, stdout, _) = run(test.extract_command())?;
    assert_eq!(code, 0);
    assert!(stdout.contains("src/main.ts:2:13  \"确定\" -> t('common.ok')"));
    assert!(stdout.contains("src/main.ts:1:16  \"远程开门\" -> t('"));
    assert!(stdout.contains("Would replace 2 literals in 1 file, creating 1 key"));
    assert!(stdout.contains("Run with --apply"));

    assert_eq!(test.read_file("src/main.ts")?, SOURCE);
    assert_eq!(test.read_file("src/locales/zh.json")?, ZH);
    assert!(!test.root().join("src/locales/en.json").exists());

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_extract_apply_writes_all_languages() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", SOURCE)?;
    test.write_file("src/locales/zh.json", ZH)?;

    let (code, stdout, stderr) = run(test.extract_with_echo_translator()?)?;
    assert_eq!(code, 0, "stdout: {}\nstderr: {}", stdout, stderr);
    assert!(stdout.contains("Replaced 2 literals in 1 file, created 1 key"));

    let zh = test.read_file("src/locales/zh.json")?;
    let key = key_of(&zh, "远程开门").expect("new key in source dictionary");
    assert_eq!(key.len(), 8);

    let en = test.read_file("src/locales/en.json")?;
    assert_eq!(key_of(&en, "en:远程开门"), Some(key.clone()));

    assert_eq!(
        test.read_file("src/main.ts")?,
        format!("const title = t('{}');\nconst ok = t('common.ok');\n", key)
    );

    Ok(())
}

#[test]
fn test_extract_without_translator_keeps_source_language() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", "const title = '远程开门';\n")?;

    let (code, stdout, _) = run({
        let mut cmd = test.extract_command();
        cmd.arg("--apply");
        cmd
    })?;
    assert_eq!(code, 0);
    assert!(stdout.contains("warning: \"远程开门\""));
    assert!(stdout.contains("= note: translation failed for 'en'"));

    let zh = test.read_file("src/locales/zh.json")?;
    assert!(key_of(&zh, "远程开门").is_some());
    assert!(!test.root().join("src/locales/en.json").exists());
    assert!(test.read_file("src/main.ts")?.starts_with("const title = t('"));

    Ok(())
}

#[test]
fn test_extract_vue_attribute_binding() -> Result<()> {
    let test = CliTest::with_file(
        "src/App.vue",
        "<template>\n  <i title=\"远程开门\"></i>\n</template>\n",
    )?;
    test.write_file("src/locales/zh.json", r#"{"common": {"ok": "远程开门"}}"#)?;

    let (code, _, _) = run({
        let mut cmd = test.extract_command();
        cmd.arg("--apply");
        cmd
    })?;
    assert_eq!(code, 0);
    assert_eq!(
        test.read_file("src/App.vue")?,
        "<template>\n  <i :title=\"t('common.ok')\"></i>\n</template>\n"
    );

    Ok(())
}

#[test]
fn test_extract_script_dictionary_keeps_module_style() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", "const title = '远程开门';\n")?;
    test.write_file(
        ".tolkrc.json",
        r#"{
  "languages": [{ "code": "zh", "file": "src/locales/zh.js" }],
  "keyPrefix": "app"
}"#,
    )?;
    test.write_file("src/locales/zh.js", "module.exports = {\n  ok: '确定',\n};\n")?;

    let (code, _, stderr) = run({
        let mut cmd = test.extract_command();
        cmd.arg("--apply");
        cmd
    })?;
    assert_eq!(code, 0, "stderr: {}", stderr);

    let dictionary = test.read_file("src/locales/zh.js")?;
    assert!(dictionary.starts_with("module.exports = {"));
    assert!(dictionary.contains("\"ok\": \"确定\""));
    assert!(dictionary.contains("\"app\": {"));
    assert!(test.read_file("src/main.ts")?.starts_with("const title = t('app."));

    Ok(())
}

#[test]
fn test_extract_nothing_to_do() -> Result<()> {
    let test = CliTest::with_file("src/main.ts", "export const answer = 42;\n")?;

    let (code, stdout, _) = run(test.extract_command())?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ Scanned 1 source file - nothing to extract\n");

    Ok(())
}

#[test]
fn test_extract_apply_keeps_unparsable_dictionary() -> Result<()> {
    let broken = r#"{"common": {"ok": "确定", "cancel": "取消"},}"#;
    let test = CliTest::with_file("src/main.ts", "const title = '远程开门';\n")?;
    test.write_file("src/locales/zh.json", broken)?;

    let (code, stdout, _) = run({
        let mut cmd = test.extract_command();
        cmd.arg("--apply");
        cmd
    })?;
    assert_eq!(code, 1, "stdout: {}", stdout);
    assert!(stdout.contains("save failed for 'zh'"));

    assert_eq!(test.read_file("src/locales/zh.json")?, broken);
    assert_eq!(test.read_file("src/main.ts")?, "const title = '远程开门';\n");

    Ok(())
}
