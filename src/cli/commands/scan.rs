use anyhow::Result;

use super::{
    CommandResult, CommandSummary, ScanSummary, Severity,
    helper::{Workspace, finding_at},
};
use crate::{
    cli::args::ScanCommand,
    core::{resolve::resolve_all, synthesize::call_expression},
    utils::LineIndex,
};

/// Report every candidate; ones with an existing key become warnings, the rest errors.
pub fn scan(cmd: ScanCommand) -> Result<CommandResult> {
    let workspace = Workspace::load(&cmd.common)?;
    let orchestrator_config = workspace.config.to_orchestrator_config()?;
    let mut scanned = workspace.scan()?;
    let (mut session, dictionary_warnings) = workspace.open_session();
    let dictionaries = session.dictionaries(&orchestrator_config.resolution_files());

    let mut findings = Vec::new();
    let mut resolved_count = 0;
    for file in &mut scanned.files {
        resolved_count += resolve_all(&mut file.candidates, &dictionaries);

        let index = LineIndex::new(&file.content);
        for candidate in &file.candidates {
            let finding = match &candidate.i18n_key {
                Some(key) => finding_at(
                    file,
                    &index,
                    candidate,
                    Severity::Warning,
                    vec![format!(
                        "key exists, replace with {}",
                        call_expression(
                            &orchestrator_config.function_name,
                            key,
                            orchestrator_config.quote
                        )
                    )],
                ),
                None => finding_at(file, &index, candidate, Severity::Error, Vec::new()),
            };
            findings.push(finding);
        }
    }

    let json_candidates = cmd.json.then(|| {
        scanned
            .files
            .iter()
            .flat_map(|file| file.candidates.iter().cloned())
            .collect()
    });

    let mut result = CommandResult::new(CommandSummary::Scan(ScanSummary {
        json_candidates,
        resolved_count,
    }));
    result.findings = findings;
    result.dictionary_warnings = dictionary_warnings;
    result.source_files_checked = scanned.files.len();
    result.unreadable_count = scanned.unreadable_count;
    Ok(result)
}
