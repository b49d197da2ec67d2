use std::{
    io::Write,
    process::{Command, Stdio},
};

use crate::error::TranslationError;

/// External translation service.
pub trait Translator {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslationError>;
}

impl<F> Translator for F
where
    F: Fn(&str, &str, &str) -> Result<String, TranslationError>,
{
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslationError> {
        self(text, source, target)
    }
}

/// Placeholder used when no translation backend is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl Translator for Unconfigured {
    fn translate(&self, _text: &str, _source: &str, target: &str) -> Result<String, TranslationError> {
        Err(TranslationError::new(
            "unconfigured",
            format!("no translator configured for '{}'", target),
        ))
    }
}

/// Runs `program args… <source> <target>` with the text on stdin and reads
/// the translation from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTranslator {
    program: String,
    args: Vec<String>,
}

impl CommandTranslator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a whitespace-separated command line. Returns `None` when it is blank.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Translator for CommandTranslator {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslationError> {
        log::debug!("running translator {} ({} -> {})", self.program, source, target);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .arg(target)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TranslationError::new("spawn", format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| TranslationError::new("io", e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| TranslationError::new("io", e.to_string()))?;

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| format!("exit-{}", c));
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TranslationError::new(code, stderr));
        }

        let translated = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if translated.is_empty() {
            return Err(TranslationError::new("empty", "translator returned no text"));
        }
        Ok(translated)
    }
}
