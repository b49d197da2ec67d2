use std::{fs, path::Path, sync::LazyLock};

use regex::Regex;
use serde_json::Value;

use super::{
    literal::{
        balanced_object, locate_object_start, parse_object_literal, recover_object_literal,
        repair_to_json,
    },
    tree::DictionaryTree,
};
use crate::error::CodecError;

static COMMONJS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\bmodule\.exports|^\s*exports)\s*=").unwrap());

/// On-disk format of a dictionary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryFormat {
    /// Strict JSON object.
    Json,
    /// A script file whose content is a single exported object literal.
    Script,
}

impl DictionaryFormat {
    /// Pick the format from the file extension (unknown extensions are JSON).
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("js" | "mjs" | "cjs" | "ts" | "mts" | "cts") => DictionaryFormat::Script,
            _ => DictionaryFormat::Json,
        }
    }
}

/// Export statement used when writing a script dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptStyle {
    /// `export default { ... };`
    #[default]
    EsModule,
    /// `module.exports = { ... };`
    CommonJs,
}

impl ScriptStyle {
    pub fn detect(content: &str) -> Self {
        if COMMONJS_REGEX.is_match(content) {
            ScriptStyle::CommonJs
        } else {
            ScriptStyle::EsModule
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            ScriptStyle::EsModule => "export default ",
            ScriptStyle::CommonJs => "module.exports = ",
        }
    }
}

/// Load a dictionary, absorbing every failure.
///
/// A missing file is an empty dictionary. An unreadable or unparsable file is
/// logged and also yields an empty dictionary, so one corrupt locale never
/// blocks scanning or replacement.
pub fn load(path: &Path) -> DictionaryTree {
    match try_load(path) {
        Ok(tree) => tree,
        Err(err) => {
            log::warn!("{}: dictionary unusable, treating as empty: {}", path.display(), err);
            DictionaryTree::new()
        }
    }
}

/// Load a dictionary, reporting why it could not be read.
///
/// A missing or blank file is `Ok` with an empty tree.
pub fn try_load(path: &Path) -> Result<DictionaryTree, CodecError> {
    if !path.exists() {
        return Ok(DictionaryTree::new());
    }
    let content = fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(DictionaryTree::new());
    }

    let parsed = match DictionaryFormat::detect(path) {
        DictionaryFormat::Json => parse_json(&content),
        DictionaryFormat::Script => parse_script(&content),
    };
    parsed.map_err(|reason| CodecError::parse(path, reason))
}

/// Strict JSON dictionary.
pub fn parse_json(content: &str) -> Result<DictionaryTree, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    DictionaryTree::from_value(value).ok_or_else(|| "root is not an object".to_string())
}

/// Script-literal dictionary, tried with increasingly forgiving strategies.
pub fn parse_script(content: &str) -> Result<DictionaryTree, String> {
    let start = locate_object_start(content).ok_or_else(|| "no object literal found".to_string())?;
    let mut reasons: Vec<String> = Vec::new();

    // 1. Balanced body through the grammar-aware parser.
    let balanced = balanced_object(content, start);
    match balanced {
        Ok(body) => match parse_object_literal(body) {
            Ok(value) => {
                if let Some(tree) = DictionaryTree::from_value(value) {
                    return Ok(tree);
                }
            }
            Err(err) => {
                log::debug!("object literal parse failed, trying repair: {}", err);
                reasons.push(err.to_string());
            }
        },
        Err(missing) => {
            log::debug!("object literal is truncated ({} unclosed), trying repair", missing);
            reasons.push(format!("{} unclosed brace(s)", missing));
        }
    }

    // 2. Textual repair (comments, trailing commas, bare keys, missing braces) + strict JSON.
    let slice = balanced.unwrap_or(&content[start..]);
    match serde_json::from_str::<Value>(&repair_to_json(slice)) {
        Ok(value) => {
            if let Some(tree) = DictionaryTree::from_value(value) {
                return Ok(tree);
            }
        }
        Err(err) => reasons.push(format!("repair: {}", err)),
    }

    // 3. Keep whatever parses before the first error.
    if let Some((value, err)) = recover_object_literal(&content[start..]) {
        let recovered_something = value.as_object().is_some_and(|map| !map.is_empty());
        if err.is_none() || recovered_something {
            if let Some(err) = &err {
                log::warn!("dictionary recovered partially: {}", err);
            }
            if let Some(tree) = DictionaryTree::from_value(value) {
                return Ok(tree);
            }
        }
    }

    Err(reasons.join("; "))
}

/// Write the whole tree to `path`, creating parent directories.
///
/// The file content is produced in memory first; the target is only touched
/// once serialization succeeded. Script files are written in canonical form,
/// keeping the CommonJS export style when the existing file used it; their
/// original comments and formatting are not preserved.
pub fn save(path: &Path, tree: &DictionaryTree) -> Result<(), CodecError> {
    let content = match DictionaryFormat::detect(path) {
        DictionaryFormat::Json => render_json(tree),
        DictionaryFormat::Script => {
            let style = fs::read_to_string(path)
                .map(|existing| ScriptStyle::detect(&existing))
                .unwrap_or_default();
            render_script(tree, style)
        }
    }
    .map_err(|e| CodecError::serialize(path, e.to_string()))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| CodecError::io(parent, e))?;
    }

    fs::write(path, content).map_err(|e| CodecError::io(path, e))
}

/// Pretty JSON with 2-space indentation and a trailing newline.
pub fn render_json(tree: &DictionaryTree) -> Result<String, serde_json::Error> {
    let mut content = serde_json::to_string_pretty(tree.as_map())?;
    content.push('\n');
    Ok(content)
}

/// Canonical exported-object form of a script dictionary.
pub fn render_script(tree: &DictionaryTree, style: ScriptStyle) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string_pretty(tree.as_map())?;
    Ok(format!("{}{};\n", style.prefix(), body))
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            DictionaryFormat::detect(Path::new("locales/zh.json")),
            DictionaryFormat::Json
        );
        assert_eq!(
            DictionaryFormat::detect(Path::new("locales/zh.js")),
            DictionaryFormat::Script
        );
        assert_eq!(
            DictionaryFormat::detect(Path::new("locales/zh.ts")),
            DictionaryFormat::Script
        );
        assert_eq!(
            DictionaryFormat::detect(Path::new("locales/zh")),
            DictionaryFormat::Json
        );
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let tree = load(&dir.path().join("absent.json"));
        assert!(tree.is_empty());
        assert!(try_load(&dir.path().join("absent.json")).is_ok());
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.json");
        fs::write(&path, r#"{"common": {"ok": "确定"}}"#).unwrap();

        let tree = load(&path);
        assert_eq!(tree.get_path("common.ok"), Some("确定"));
    }

    #[test]
    fn test_load_corrupt_json_is_absorbed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.json");
        fs::write(&path, r#"{ "common": { "ok": "确定", } "#).unwrap();

        assert!(load(&path).is_empty());
        let err = try_load(&path).unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }));
    }

    #[test]
    fn test_load_json_array_root_is_absorbed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.json");
        fs::write(&path, r#"["a", "b"]"#).unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn test_load_blank_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.js");
        fs::write(&path, "\n  \n").unwrap();
        assert!(try_load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_script_literal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.js");
        fs::write(
            &path,
            r#"// generated by hand
export default {
  common: {
    ok: '确定', // confirm
    cancel: "取消",
  },
  'door.open': `远程开门`,
}
"#,
        )
        .unwrap();

        let tree = load(&path);
        assert_eq!(tree.get_path("common.ok"), Some("确定"));
        assert_eq!(tree.get_path("common.cancel"), Some("取消"));
        assert_eq!(
            tree.as_map().get("door.open"),
            Some(&Value::String("远程开门".to_string()))
        );
    }

    #[test]
    fn test_load_commonjs_literal() {
        let tree = parse_script("module.exports = { a: { b: 'c' } };\n").unwrap();
        assert_eq!(tree.get_path("a.b"), Some("c"));
    }

    #[test]
    fn test_load_truncated_script_repairs_braces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.js");
        fs::write(&path, r#"{"a": {"b": "c""#).unwrap();

        let tree = load(&path);
        assert_eq!(tree.to_value(), json!({"a": {"b": "c"}}));
    }

    #[test]
    fn test_load_script_falls_back_to_partial_recovery() {
        let content = "export default {\n  a: '1',\n  b: helper('x'),\n  c: '3'\n}\n";
        let tree = parse_script(content).unwrap();
        assert_eq!(tree.to_value(), json!({"a": "1"}));
    }

    #[test]
    fn test_load_script_without_object_is_absorbed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.js");
        fs::write(&path, "export default messages;\n").unwrap();

        assert!(load(&path).is_empty());
        assert!(try_load(&path).is_err());
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("src").join("locales").join("zh.json");

        let mut tree = DictionaryTree::new();
        tree.set_path("common.ok", "确定");
        save(&path, &tree).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("}\n"));
        assert_eq!(load(&path), tree);
    }

    #[test]
    fn test_save_preserves_untouched_branches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.json");
        fs::write(
            &path,
            r#"{"page": {"title": "首页", "meta": {"count": 2}}, "list": [1, 2]}"#,
        )
        .unwrap();

        let mut tree = load(&path);
        tree.set_path("common.ok", "确定");
        save(&path, &tree).unwrap();

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            saved,
            json!({
                "page": {"title": "首页", "meta": {"count": 2}},
                "list": [1, 2],
                "common": {"ok": "确定"}
            })
        );
    }

    #[test]
    fn test_render_script_canonical_form() {
        let tree = DictionaryTree::from_value(json!({"common": {"ok": "确定"}})).unwrap();
        let rendered = render_script(&tree, ScriptStyle::EsModule).unwrap();
        assert_snapshot!(rendered.trim_end(), @r#"
        export default {
          "common": {
            "ok": "确定"
          }
        };
        "#);
    }

    #[test]
    fn test_save_script_keeps_commonjs_style() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh.js");
        fs::write(&path, "module.exports = {\n  a: 'b', // note\n};\n").unwrap();

        let mut tree = load(&path);
        tree.set_path("c", "d");
        save(&path, &tree).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("module.exports = {"));
        assert!(!content.contains("// note"));
        assert_eq!(load(&path).get_path("c"), Some("d"));
        assert_eq!(load(&path).get_path("a"), Some("b"));
    }

    #[test]
    fn test_save_new_script_uses_export_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.ts");
        let mut tree = DictionaryTree::new();
        tree.set_path("a", "b");
        save(&path, &tree).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("export default {"));
        assert!(content.ends_with("};\n"));
    }

    #[test]
    fn test_script_style_detect() {
        assert_eq!(
            ScriptStyle::detect("module.exports = {}"),
            ScriptStyle::CommonJs
        );
        assert_eq!(ScriptStyle::detect("export default {}"), ScriptStyle::EsModule);
    }
}
