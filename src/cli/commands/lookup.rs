use anyhow::Result;

use super::{CommandResult, CommandSummary, LookupSummary, helper::Workspace};
use crate::{cli::args::LookupCommand, core::resolve::resolve_text};

pub fn lookup(cmd: LookupCommand) -> Result<CommandResult> {
    let workspace = Workspace::load(&cmd.common)?;
    let config = workspace.config.to_orchestrator_config()?;
    let (mut session, dictionary_warnings) = workspace.open_session();

    let hit = resolve_text(&cmd.text, &session.dictionaries(&config.resolution_files()));
    let key = hit.map(|hit| hit.key);

    let values = match &key {
        Some(key) => config
            .languages
            .iter()
            .map(|mapping| {
                let value = session.dictionary(&mapping.file).get_path(key).map(str::to_string);
                (mapping.code.clone(), value)
            })
            .collect(),
        None => Vec::new(),
    };

    let mut result = CommandResult::new(CommandSummary::Lookup(LookupSummary {
        text: cmd.text,
        key,
        values,
    }));
    result.dictionary_warnings = dictionary_warnings;
    Ok(result)
}
