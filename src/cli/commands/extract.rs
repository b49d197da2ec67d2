use std::{collections::HashSet, fs};

use anyhow::{Context, Result};

use super::{
    CommandResult, CommandSummary, ExtractEntry, ExtractSummary, Finding, Severity,
    helper::{ScannedFile, Workspace, finding_at, location},
};
use crate::{
    cli::args::ExtractCommand,
    core::{
        CandidateState, Orchestrator, OrchestratorConfig, Session,
        edit::apply_plans,
        keygen::{self, KeyPolicy},
        orchestrator::{CandidateOutcome, FailureStage},
        resolve::resolve,
        synthesize::{ReplacementPlan, synthesize},
        translate::{CommandTranslator, Translator, Unconfigured},
    },
    utils::LineIndex,
};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let workspace = Workspace::load(&cmd.common)?;
    let config = workspace.config.to_orchestrator_config()?;
    let scanned = workspace.scan()?;
    let (mut session, dictionary_warnings) = workspace.open_session();

    let mut summary = ExtractSummary {
        is_apply: cmd.apply,
        entries: Vec::new(),
        created_count: 0,
        replaced_count: 0,
        skipped_count: 0,
        file_count: 0,
    };
    let mut findings = Vec::new();

    if cmd.apply {
        let command_line = cmd
            .translator_cmd
            .or_else(|| workspace.config.translator_command.clone());
        let translator: Box<dyn Translator> =
            match command_line.as_deref().and_then(CommandTranslator::parse) {
                Some(command) => Box::new(command),
                None => {
                    if config.translate_all_languages && config.target_mappings().next().is_some() {
                        log::warn!("no translator configured, target languages will be skipped");
                    }
                    Box::new(Unconfigured)
                }
            };
        let orchestrator = Orchestrator::new(&config, &*translator);

        for file in &scanned.files {
            apply_file(file, &orchestrator, &mut session, &mut summary, &mut findings)?;
        }
    } else {
        let mut pending = HashSet::new();
        for file in &scanned.files {
            preview_file(file, &config, &mut session, &mut summary, &mut pending);
        }
    }

    let mut result = CommandResult::new(CommandSummary::Extract(summary));
    result.findings = findings;
    result.dictionary_warnings = dictionary_warnings;
    result.source_files_checked = scanned.files.len();
    result.unreadable_count = scanned.unreadable_count;
    Ok(result)
}

fn apply_file(
    file: &ScannedFile,
    orchestrator: &Orchestrator,
    session: &mut Session,
    summary: &mut ExtractSummary,
    findings: &mut Vec<Finding>,
) -> Result<()> {
    if file.candidates.is_empty() {
        return Ok(());
    }

    let index = LineIndex::new(&file.content);
    let outcomes = orchestrator.process_batch(session, file.candidates.clone(), Some(&file.dialect));

    let mut plans = Vec::new();
    for outcome in &outcomes {
        if outcome.created {
            summary.created_count += 1;
        }
        if let Some(finding) = failure_finding(file, &index, outcome) {
            findings.push(finding);
        }
        summary.entries.push(ExtractEntry {
            location: location(file, &index, &outcome.candidate),
            text: outcome.candidate.text.clone(),
            replacement: outcome.is_applicable().then(|| outcome.plan.text.clone()),
            state: outcome.state,
        });
        if outcome.is_applicable() {
            plans.push(outcome.plan.clone());
        }
    }

    let edits = apply_plans(&file.content, 0, &plans);
    summary.skipped_count += edits.skipped;
    if edits.applied > 0 {
        fs::write(&file.path, &edits.text)
            .with_context(|| format!("Failed to write file: {}", file.path.display()))?;
        summary.replaced_count += edits.applied;
        summary.file_count += 1;
    }
    Ok(())
}

/// Compute what `--apply` would do without touching dictionaries or sources.
fn preview_file(
    file: &ScannedFile,
    config: &OrchestratorConfig,
    session: &mut Session,
    summary: &mut ExtractSummary,
    pending: &mut HashSet<String>,
) {
    if file.candidates.is_empty() {
        return;
    }

    let index = LineIndex::new(&file.content);
    let files = config.resolution_files();
    let source_file = config.source_mapping().map(|mapping| mapping.file.clone());

    let mut plans: Vec<ReplacementPlan> = Vec::new();
    for candidate in &file.candidates {
        let hit = resolve(candidate, &session.dictionaries(&files));
        let (key, state) = match hit {
            Some(hit) => (Some(hit.key), CandidateState::Resolved),
            None => {
                if pending.insert(candidate.text.clone()) {
                    summary.created_count += 1;
                }
                let key = match (config.key_policy, &source_file) {
                    (KeyPolicy::Hash, Some(source)) => Some(keygen::disambiguate(
                        &keygen::hash_key(&config.key_prefix, &candidate.text),
                        &candidate.text,
                        session.dictionary(source),
                    )),
                    // Translated keys are only known once the translator runs
                    _ => None,
                };
                (key, CandidateState::KeyPending)
            }
        };

        let plan = key.map(|key| {
            synthesize(
                candidate,
                &key,
                &config.function_name,
                config.quote,
                Some(&file.dialect),
            )
        });
        summary.entries.push(ExtractEntry {
            location: location(file, &index, candidate),
            text: candidate.text.clone(),
            replacement: plan.as_ref().map(|plan| plan.text.clone()),
            state,
        });
        plans.extend(plan);
    }

    let edits = apply_plans(&file.content, 0, &plans);
    summary.skipped_count += edits.skipped;
    summary.replaced_count += edits.applied;
    if edits.applied > 0 {
        summary.file_count += 1;
    }
}

fn failure_finding(file: &ScannedFile, index: &LineIndex, outcome: &CandidateOutcome) -> Option<Finding> {
    if outcome.failures.is_empty() {
        return None;
    }
    let severity = if outcome.state == CandidateState::Failed {
        Severity::Error
    } else {
        Severity::Warning
    };
    let notes = outcome
        .failures
        .iter()
        .map(|failure| {
            format!(
                "{} failed for '{}': {}",
                stage_label(failure.stage),
                failure.language,
                failure.message
            )
        })
        .collect();
    Some(finding_at(file, index, &outcome.candidate, severity, notes))
}

fn stage_label(stage: FailureStage) -> &'static str {
    match stage {
        FailureStage::KeyGeneration => "key generation",
        FailureStage::Translation => "translation",
        FailureStage::Save => "save",
    }
}
