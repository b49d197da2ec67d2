use crate::core::{Candidate, CandidateContext, CandidateState};

use super::super::exit_status::ExitStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

/// One located problem, ready for cargo-style printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
    pub source_line: String,
    pub severity: Severity,
    pub message: String,
    pub context: CandidateContext,
    pub notes: Vec<String>,
}

/// A planned or applied replacement, listed in extract output.
#[derive(Debug, Clone)]
pub struct ExtractEntry {
    pub location: String,
    pub text: String,
    /// Call expression inserted for the literal; `None` when the key is not known yet.
    pub replacement: Option<String>,
    pub state: CandidateState,
}

#[derive(Debug)]
pub struct ScanSummary {
    /// Set when `--json` was passed; printed instead of the findings.
    pub json_candidates: Option<Vec<Candidate>>,
    pub resolved_count: usize,
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub is_apply: bool,
    pub entries: Vec<ExtractEntry>,
    pub created_count: usize,
    pub replaced_count: usize,
    /// Plans dropped because they overlapped another plan in the same file.
    pub skipped_count: usize,
    pub file_count: usize,
}

#[derive(Debug)]
pub struct LookupSummary {
    pub text: String,
    pub key: Option<String>,
    /// Value of the key in each configured language, in config order.
    pub values: Vec<(String, Option<String>)>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: String,
}

#[derive(Debug)]
pub enum CommandSummary {
    Scan(ScanSummary),
    Extract(ExtractSummary),
    Lookup(LookupSummary),
    Init(InitSummary),
}

/// Result of running a tolk command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Problems to print, sorted by location.
    pub findings: Vec<Finding>,
    /// Dictionary files that could not be loaded and were treated as empty.
    pub dictionary_warnings: Vec<String>,
    pub source_files_checked: usize,
    /// Source files that could not be read.
    pub unreadable_count: usize,
}

impl CommandResult {
    pub fn new(summary: CommandSummary) -> Self {
        Self {
            summary,
            findings: Vec::new(),
            dictionary_warnings: Vec::new(),
            source_files_checked: 0,
            unreadable_count: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }

    pub fn exit_status(&self) -> ExitStatus {
        let lookup_missed = matches!(
            &self.summary,
            CommandSummary::Lookup(LookupSummary { key: None, .. })
        );
        ExitStatus::completed(self.error_count(), lookup_missed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity) -> Finding {
        Finding {
            file_path: "src/a.ts".to_string(),
            line: 1,
            col: 1,
            source_line: String::new(),
            severity,
            message: "确定".to_string(),
            context: CandidateContext::StringVariable,
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_exit_status_from_findings() {
        let mut result = CommandResult::new(CommandSummary::Init(InitSummary {
            path: ".tolkrc.json".to_string(),
        }));
        assert_eq!(result.exit_status(), ExitStatus::Success);

        result.findings.push(finding(Severity::Warning));
        assert_eq!(result.exit_status(), ExitStatus::Success);

        result.findings.push(finding(Severity::Error));
        assert_eq!(result.exit_status(), ExitStatus::Failure);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_lookup_miss_fails() {
        let result = CommandResult::new(CommandSummary::Lookup(LookupSummary {
            text: "取消".to_string(),
            key: None,
            values: Vec::new(),
        }));
        assert_eq!(result.exit_status(), ExitStatus::Failure);
    }
}
