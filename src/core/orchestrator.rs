//! Per-candidate pipeline: resolve, or create a key, write it and translate it.
//!
//! ```text
//! Scanned ─┬─> Resolved
//!          └─> KeyPending ─> KeyAssigned ─> Translating ─> Persisted
//! ```
//!
//! Every step that touches disk or the translator runs sequentially. Failures
//! are recorded on the outcome and never escape a candidate.

use serde::{Deserialize, Serialize};

use crate::core::{
    candidate::Candidate,
    dialect::Dialect,
    keygen::{self, KeyPolicy},
    resolve::resolve,
    session::Session,
    synthesize::{ReplacementPlan, synthesize},
    translate::Translator,
};

/// A language code and the dictionary file that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageMapping {
    pub code: String,
    pub file: String,
}

/// Settings the orchestrator needs; built from the project configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub function_name: String,
    pub quote: char,
    pub source_language: String,
    pub languages: Vec<LanguageMapping>,
    pub key_prefix: String,
    pub key_policy: KeyPolicy,
    pub translate_all_languages: bool,
    pub neutral_language: String,
}

impl OrchestratorConfig {
    /// Mapping whose code is the source language.
    pub fn source_mapping(&self) -> Option<&LanguageMapping> {
        self.languages
            .iter()
            .find(|mapping| mapping.code == self.source_language)
    }

    /// Every mapping except the source one, in configured order.
    pub fn target_mappings(&self) -> impl Iterator<Item = &LanguageMapping> {
        self.languages
            .iter()
            .filter(|mapping| mapping.code != self.source_language)
    }

    /// Dictionary files in resolution order: the source file first.
    pub fn resolution_files(&self) -> Vec<&str> {
        self.source_mapping()
            .into_iter()
            .chain(self.target_mappings())
            .map(|mapping| mapping.file.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateState {
    Scanned,
    Resolved,
    KeyPending,
    KeyAssigned,
    Translating,
    Persisted,
    /// The source dictionary could not be written; the key does not exist on disk.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureStage {
    KeyGeneration,
    Translation,
    Save,
}

/// One recorded failure for a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageFailure {
    pub language: String,
    pub stage: FailureStage,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateOutcome {
    /// The candidate with `i18n_key` set.
    pub candidate: Candidate,
    pub key: String,
    pub state: CandidateState,
    /// The key was created by this run rather than found.
    pub created: bool,
    /// Languages whose dictionary received the text, source included.
    pub written: Vec<String>,
    pub failures: Vec<LanguageFailure>,
    pub plan: ReplacementPlan,
}

impl CandidateOutcome {
    /// The plan is safe to apply: the key exists in the source dictionary.
    pub fn is_applicable(&self) -> bool {
        matches!(self.state, CandidateState::Resolved | CandidateState::Persisted)
    }
}

pub struct Orchestrator<'a> {
    config: &'a OrchestratorConfig,
    translator: &'a dyn Translator,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a OrchestratorConfig, translator: &'a dyn Translator) -> Self {
        Self { config, translator }
    }

    /// Process candidates one after another; later ones see keys created by earlier ones.
    pub fn process_batch(
        &self,
        session: &mut Session,
        candidates: Vec<Candidate>,
        probe: Option<&Dialect>,
    ) -> Vec<CandidateOutcome> {
        candidates
            .into_iter()
            .map(|candidate| self.process(session, candidate, probe))
            .collect()
    }

    pub fn process(
        &self,
        session: &mut Session,
        mut candidate: Candidate,
        probe: Option<&Dialect>,
    ) -> CandidateOutcome {
        let files = self.config.resolution_files();
        let hit = resolve(&candidate, &session.dictionaries(&files));

        if let Some(hit) = hit {
            log::trace!("resolved to {}", hit.key);
            return self.outcome(candidate, hit.key, CandidateState::Resolved, false, Vec::new(), Vec::new(), probe);
        }

        let mut failures = Vec::new();
        let mut written = Vec::new();

        let Some(source) = self.config.source_mapping() else {
            // Config validation guarantees a source mapping; keep the candidate untouched otherwise.
            failures.push(LanguageFailure {
                language: self.config.source_language.clone(),
                stage: FailureStage::Save,
                message: "no dictionary mapped to the source language".to_string(),
            });
            let key = keygen::hash_key(&self.config.key_prefix, &candidate.text);
            return self.outcome(candidate, key, CandidateState::Failed, false, written, failures, probe);
        };

        // KeyPending
        let base_key = self.generate_key(&candidate.text, &mut failures);
        let key = keygen::disambiguate(&base_key, &candidate.text, session.dictionary(&source.file));
        candidate.i18n_key = Some(key.clone());

        // KeyAssigned
        session
            .dictionary_mut(&source.file)
            .set_path(&key, candidate.text.as_str());
        if let Err(err) = session.persist(&source.file) {
            log::warn!("source dictionary not saved for {}: {}", key, err);
            failures.push(LanguageFailure {
                language: source.code.clone(),
                stage: FailureStage::Save,
                message: err.to_string(),
            });
            session.reload(&source.file);
            return self.outcome(candidate, key, CandidateState::Failed, true, written, failures, probe);
        }
        written.push(source.code.clone());
        log::trace!("key assigned: {}", key);

        // Translating
        if self.config.translate_all_languages {
            for target in self.config.target_mappings() {
                match self
                    .translator
                    .translate(&candidate.text, &self.config.source_language, &target.code)
                {
                    Ok(translated) => {
                        session.dictionary_mut(&target.file).set_path(&key, translated);
                        match session.persist(&target.file) {
                            Ok(()) => written.push(target.code.clone()),
                            Err(err) => failures.push(LanguageFailure {
                                language: target.code.clone(),
                                stage: FailureStage::Save,
                                message: err.to_string(),
                            }),
                        }
                    }
                    Err(err) => {
                        log::debug!("translation to {} failed: {}", target.code, err);
                        failures.push(LanguageFailure {
                            language: target.code.clone(),
                            stage: FailureStage::Translation,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        self.outcome(candidate, key, CandidateState::Persisted, true, written, failures, probe)
    }

    fn generate_key(&self, text: &str, failures: &mut Vec<LanguageFailure>) -> String {
        let prefix = &self.config.key_prefix;
        match self.config.key_policy {
            KeyPolicy::Hash => keygen::hash_key(prefix, text),
            KeyPolicy::Translate => {
                let neutral = &self.config.neutral_language;
                let rendering = if *neutral == self.config.source_language {
                    Ok(text.to_string())
                } else {
                    self.translator
                        .translate(text, &self.config.source_language, neutral)
                };
                match rendering.map(|rendered| keygen::slugify(&rendered)) {
                    Ok(slug) if !slug.is_empty() => keygen::prefixed(prefix, &slug),
                    Ok(_) => keygen::hash_key(prefix, text),
                    Err(err) => {
                        failures.push(LanguageFailure {
                            language: neutral.clone(),
                            stage: FailureStage::KeyGeneration,
                            message: err.to_string(),
                        });
                        keygen::hash_key(prefix, text)
                    }
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn outcome(
        &self,
        mut candidate: Candidate,
        key: String,
        state: CandidateState,
        created: bool,
        written: Vec<String>,
        failures: Vec<LanguageFailure>,
        probe: Option<&Dialect>,
    ) -> CandidateOutcome {
        candidate.i18n_key = Some(key.clone());
        let plan = synthesize(
            &candidate,
            &key,
            &self.config.function_name,
            self.config.quote,
            probe,
        );
        CandidateOutcome {
            candidate,
            key,
            state,
            created,
            written,
            failures,
            plan,
        }
    }
}
