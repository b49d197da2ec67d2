use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    keygen::KeyPolicy,
    orchestrator::{LanguageMapping, OrchestratorConfig},
    scanner::filter::{Alphabetic, ScriptRange, TextFilter},
};

pub const CONFIG_FILE_NAME: &str = ".tolkrc.json";

/// Which text the scanner treats as natural language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextFilterConfig {
    #[default]
    Cjk,
    Alphabetic,
    /// Code point ranges such as `"3040-30FF"`.
    Ranges(Vec<String>),
}

impl TextFilterConfig {
    pub fn build(&self) -> Result<Arc<dyn TextFilter>> {
        let filter: Arc<dyn TextFilter> = match self {
            TextFilterConfig::Cjk => Arc::new(ScriptRange::cjk()),
            TextFilterConfig::Alphabetic => Arc::new(Alphabetic),
            TextFilterConfig::Ranges(specs) => Arc::new(
                ScriptRange::parse(specs)
                    .map_err(anyhow::Error::msg)
                    .context("Invalid 'textFilter' ranges")?,
            ),
        };
        Ok(filter)
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_property_names")]
    pub property_names: Vec<String>,
    #[serde(default = "default_function_name")]
    pub function_name: String,
    #[serde(default = "default_quote")]
    pub quote: String,
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageMapping>,
    #[serde(default)]
    pub key_prefix: String,
    #[serde(default)]
    pub key_policy: KeyPolicy,
    #[serde(default = "default_translate_all_languages")]
    pub translate_all_languages: bool,
    #[serde(default)]
    pub text_filter: TextFilterConfig,
    #[serde(default = "default_neutral_language")]
    pub neutral_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator_command: Option<String>,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    ["**/node_modules/**", "**/dist/**"].map(String::from).to_vec()
}

fn default_property_names() -> Vec<String> {
    ["label", "title", "placeholder", "message", "text"]
        .map(String::from)
        .to_vec()
}

fn default_function_name() -> String {
    "t".to_string()
}

fn default_quote() -> String {
    "'".to_string()
}

fn default_source_language() -> String {
    "zh".to_string()
}

fn default_languages() -> Vec<LanguageMapping> {
    [("zh", "src/locales/zh.json"), ("en", "src/locales/en.json")]
        .map(|(code, file)| LanguageMapping {
            code: code.to_string(),
            file: file.to_string(),
        })
        .to_vec()
}

fn default_translate_all_languages() -> bool {
    true
}

fn default_neutral_language() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: default_ignores(),
            property_names: default_property_names(),
            function_name: default_function_name(),
            quote: default_quote(),
            source_language: default_source_language(),
            languages: default_languages(),
            key_prefix: String::new(),
            key_policy: KeyPolicy::default(),
            translate_all_languages: default_translate_all_languages(),
            text_filter: TextFilterConfig::default(),
            neutral_language: default_neutral_language(),
            translator_command: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Checks glob patterns, the quote character, the call name, the text
    /// filter and that the source language has a dictionary.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        self.quote_char()?;

        if self.function_name.trim().is_empty() {
            bail!("'functionName' must not be empty");
        }

        if !self
            .languages
            .iter()
            .any(|mapping| mapping.code == self.source_language)
        {
            bail!(
                "No entry in 'languages' for the source language \"{}\"",
                self.source_language
            );
        }

        self.text_filter.build()?;

        Ok(())
    }

    /// The configured quote as a character: `'` or `"`.
    pub fn quote_char(&self) -> Result<char> {
        match self.quote.as_str() {
            "'" => Ok('\''),
            "\"" => Ok('"'),
            other => bail!("Invalid 'quote': \"{}\" (expected ' or \")", other),
        }
    }

    /// Dictionary files resolved against `root`; never scanned as source.
    pub fn dictionary_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.languages
            .iter()
            .map(|mapping| root.join(&mapping.file))
            .collect()
    }

    pub fn to_orchestrator_config(&self) -> Result<OrchestratorConfig> {
        Ok(OrchestratorConfig {
            function_name: self.function_name.clone(),
            quote: self.quote_char()?,
            source_language: self.source_language.clone(),
            languages: self.languages.clone(),
            key_prefix: self.key_prefix.clone(),
            key_policy: self.key_policy,
            translate_all_languages: self.translate_all_languages,
            neutral_language: self.neutral_language.clone(),
        })
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory holding the config file, or the start directory for defaults.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            log::debug!("config loaded from {}", path.display());
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
