use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_lookup_hit_lists_languages() -> Result<()> {
    let test = CliTest::with_file("src/locales/zh.json", r#"{"common": {"ok": "确定"}}"#)?;
    test.write_file("src/locales/en.json", r#"{"common": {"ok": "OK"}}"#)?;

    let (code, stdout, _) = run(test.lookup_command("确定"))?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ common.ok\n  zh: \"确定\"\n  en: \"OK\"\n");

    Ok(())
}

#[test]
fn test_lookup_trims_text() -> Result<()> {
    let test = CliTest::with_file("src/locales/zh.json", r#"{"ok": "确定"}"#)?;

    let (code, stdout, _) = run(test.lookup_command("  确定 "))?;
    assert_eq!(code, 0);
    assert!(stdout.starts_with("✓ ok\n"));
    assert!(stdout.contains("  en: (missing)"));

    Ok(())
}

#[test]
fn test_lookup_miss() -> Result<()> {
    let test = CliTest::with_file("src/locales/zh.json", r#"{"ok": "确定"}"#)?;

    let (code, stdout, _) = run(test.lookup_command("取消"))?;
    assert_eq!(code, 1);
    assert_eq!(stdout, "✘ No key found for \"取消\"\n");

    Ok(())
}

#[test]
fn test_lookup_script_dictionary() -> Result<()> {
    let test = CliTest::with_file(
        "src/locales/zh.js",
        "export default {\n  common: { ok: '确定' },\n};\n",
    )?;
    test.write_file(
        ".tolkrc.json",
        r#"{ "languages": [{ "code": "zh", "file": "src/locales/zh.js" }] }"#,
    )?;

    let (code, stdout, _) = run(test.lookup_command("确定"))?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ common.ok\n  zh: \"确定\"\n");

    Ok(())
}

#[test]
fn test_lookup_corrupt_dictionary_warns() -> Result<()> {
    let test = CliTest::with_file("src/locales/zh.json", "{ not json")?;

    let (code, _, stderr) = run(test.lookup_command("确定"))?;
    assert_eq!(code, 1);
    assert!(stderr.contains("warning: Failed to parse dictionary"));

    Ok(())
}
