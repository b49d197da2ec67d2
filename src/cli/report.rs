//! Report formatting and printing utilities.
//!
//! Findings are printed in cargo-style format; command summaries follow.
//! Kept apart from the commands so the core stays usable as a library.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, Finding, InitSummary, LookupSummary,
    ScanSummary, Severity,
};
use crate::core::CandidateState;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) -> Result<()> {
    print_to(result, verbose, &mut io::stdout().lock())?;
    print_warnings_to(result, verbose, &mut io::stderr().lock());
    Ok(())
}

/// Print a command result to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) -> Result<()> {
    match &result.summary {
        CommandSummary::Scan(summary) => print_scan(result, summary, writer)?,
        CommandSummary::Extract(summary) => print_extract(result, summary, verbose, writer),
        CommandSummary::Lookup(summary) => print_lookup(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
    Ok(())
}

/// Print findings sorted by location, followed by a problem count.
pub fn report_to<W: Write>(findings: &[Finding], writer: &mut W) {
    if findings.is_empty() {
        return;
    }

    let mut sorted: Vec<&Finding> = findings.iter().collect();
    sorted.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.col.cmp(&b.col))
    });

    let max_line_width = sorted
        .iter()
        .map(|finding| finding.line)
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1);

    for finding in &sorted {
        print_finding(finding, writer, max_line_width);
    }

    print_summary(findings, writer);
}

// ============================================================
// Internal Functions
// ============================================================

fn print_finding<W: Write>(finding: &Finding, writer: &mut W, max_line_width: usize) {
    let (severity, caret) = match finding.severity {
        Severity::Error => ("error".bold().red(), "^".red()),
        Severity::Warning => ("warning".bold().yellow(), "^".yellow()),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity,
        finding.message,
        finding.context.as_str().dimmed().cyan()
    );
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        finding.file_path,
        finding.line,
        finding.col
    );

    let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = max_line_width);
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        finding.line.to_string().blue(),
        "|".blue(),
        finding.source_line,
        width = max_line_width
    );

    // col is 1-based and counts characters
    let prefix: String = finding
        .source_line
        .chars()
        .take(finding.col.saturating_sub(1))
        .collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let first_line = finding.message.lines().next().unwrap_or("");
    let underline = caret.to_string().repeat(UnicodeWidthStr::width(first_line).max(1));
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        underline,
        width = max_line_width,
        padding = caret_padding
    );

    for note in &finding.notes {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            note,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(findings: &[Finding], writer: &mut W) {
    let errors = findings
        .iter()
        .filter(|finding| finding.severity == Severity::Error)
        .count();
    let warnings = findings.len() - errors;

    let _ = writeln!(
        writer,
        "{} {} ({} {}, {} {})",
        FAILURE_MARK.red(),
        plural(findings.len(), "problem"),
        errors,
        if errors == 1 { "error" } else { "errors" }.red(),
        warnings,
        if warnings == 1 { "warning" } else { "warnings" }.yellow()
    );
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn print_success<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());
}

fn print_scan<W: Write>(result: &CommandResult, summary: &ScanSummary, writer: &mut W) -> Result<()> {
    if let Some(candidates) = &summary.json_candidates {
        let json = serde_json::to_string_pretty(candidates).context("Failed to serialize candidates")?;
        let _ = writeln!(writer, "{}", json);
        return Ok(());
    }

    if result.findings.is_empty() {
        print_success(
            &format!(
                "Scanned {} - no hard-coded text found",
                plural(result.source_files_checked, "source file")
            ),
            writer,
        );
        return Ok(());
    }

    report_to(&result.findings, writer);
    if summary.resolved_count > 0 {
        let _ = writeln!(
            writer,
            "{} already in a dictionary. Run {} to replace them.",
            plural(summary.resolved_count, "text"),
            "tolk extract".cyan()
        );
    }
    Ok(())
}

fn print_extract<W: Write>(
    result: &CommandResult,
    summary: &ExtractSummary,
    verbose: bool,
    writer: &mut W,
) {
    if summary.entries.is_empty() {
        print_success(
            &format!(
                "Scanned {} - nothing to extract",
                plural(result.source_files_checked, "source file")
            ),
            writer,
        );
        return;
    }

    report_to(&result.findings, writer);

    if !summary.is_apply || verbose {
        for entry in &summary.entries {
            let replacement = match (&entry.replacement, entry.state) {
                (Some(call), _) => call.cyan().to_string(),
                (None, CandidateState::KeyPending) => "(key assigned on apply)".dimmed().to_string(),
                (None, _) => "(not replaced)".red().to_string(),
            };
            let _ = writeln!(
                writer,
                "  {}  \"{}\" -> {}",
                entry.location, entry.text, replacement
            );
        }
    }

    if summary.is_apply {
        let _ = writeln!(
            writer,
            "{} {} in {}, created {}",
            "Replaced".green().bold(),
            plural(summary.replaced_count, "literal"),
            plural(summary.file_count, "file"),
            plural(summary.created_count, "key")
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} in {}, creating {}",
            "Would replace".yellow().bold(),
            plural(summary.replaced_count, "literal"),
            plural(summary.file_count, "file"),
            plural(summary.created_count, "key")
        );
        let _ = writeln!(
            writer,
            "Run with {} to write dictionaries and rewrite sources.",
            "--apply".cyan()
        );
    }

    if summary.skipped_count > 0 {
        let _ = writeln!(
            writer,
            "{} {} skipped (overlapping another replacement)",
            "note:".bold(),
            plural(summary.skipped_count, "replacement")
        );
    }
}

fn print_lookup<W: Write>(summary: &LookupSummary, writer: &mut W) {
    let Some(key) = &summary.key else {
        let _ = writeln!(
            writer,
            "{} No key found for \"{}\"",
            FAILURE_MARK.red(),
            summary.text
        );
        return;
    };

    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), key.green().bold());
    for (language, value) in &summary.values {
        let value = match value {
            Some(value) => format!("\"{}\"", value),
            None => "(missing)".dimmed().to_string(),
        };
        let _ = writeln!(writer, "  {}: {}", language.cyan(), value);
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    print_success(&format!("Created {}", summary.path), writer);
}

/// Dictionary load problems and unreadable files, printed to stderr.
fn print_warnings_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    for warning in &result.dictionary_warnings {
        let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), warning);
    }
    if result.unreadable_count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} could not be read (use {} for details)",
            "warning:".bold().yellow(),
            plural(result.unreadable_count, "path"),
            "-v".cyan()
        );
    }
}
