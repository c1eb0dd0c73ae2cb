//! Instruction table and resolution.

use std::rc::Rc;

use hoil_ir::{InstructionId, Snippet, StringInterner};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    parse_snippet, BridgeError, SnippetCache, StatementRequest, TranslationRequest, Translator,
};

/// Name and parameter names of a callable function, as advertised to the
/// translation service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<String>,
}

impl FunctionSignature {
    pub fn new<S: Into<String>>(name: impl Into<String>, params: impl IntoIterator<Item = S>) -> Self {
        FunctionSignature {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

/// Build-phase table: statements are appended as the builder meets them.
#[derive(Debug, Default)]
pub struct InstructionTable {
    statements: Vec<Rc<str>>,
    functions: Vec<FunctionSignature>,
}

impl InstructionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a statement and return its id.
    pub fn submit(&mut self, statement: impl Into<Rc<str>>) -> InstructionId {
        // Saturates at u32::MAX
        let id = InstructionId::new(u32::try_from(self.statements.len()).unwrap_or(u32::MAX));
        self.statements.push(statement.into());
        id
    }

    /// Advertise a function that snippets may call.
    pub fn describe_function(&mut self, signature: FunctionSignature) {
        if !self.functions.iter().any(|f| f.name == signature.name) {
            self.functions.push(signature);
        }
    }

    pub fn statement(&self, id: InstructionId) -> Option<&str> {
        self.statements.get(id.index()).map(|s| &**s)
    }

    pub fn functions(&self) -> &[FunctionSignature] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Resolve every statement to a snippet.
    ///
    /// Cached statements never reach the translator. Everything else is sent
    /// in one request, and only snippets that parse are written back to the
    /// cache. Without a translator uncached statements stay unresolved.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = self.statements.len()))]
    pub fn resolve(
        self,
        cache: &mut SnippetCache,
        translator: Option<&dyn Translator>,
        interner: &StringInterner,
    ) -> Result<ResolvedInstructions, BridgeError> {
        let mut resolutions: Vec<Resolution> = Vec::with_capacity(self.statements.len());
        let mut pending = Vec::new();

        for (index, statement) in self.statements.iter().enumerate() {
            let id = InstructionId::new(u32::try_from(index).unwrap_or(u32::MAX));
            let cached = cache.get(statement).map(|text| parse_snippet(text, interner));
            match cached {
                Some(Ok(snippet)) => {
                    tracing::debug!(%id, statement = %statement, "instruction cache hit");
                    resolutions.push(Resolution::Resolved(snippet));
                    continue;
                }
                Some(Err(err)) => {
                    tracing::warn!(%id, statement = %statement, error = %err, "cached snippet no longer parses, retranslating");
                    cache.remove(statement);
                }
                None => tracing::debug!(%id, statement = %statement, "instruction cache miss"),
            }
            resolutions.push(Resolution::Unresolved {
                reason: "statement was not translated".to_owned(),
            });
            pending.push(StatementRequest {
                id: id.raw(),
                stmt: statement.to_string(),
            });
        }

        if !pending.is_empty() {
            match translator {
                Some(translator) => {
                    let sent: FxHashSet<u32> = pending.iter().map(|s| s.id).collect();
                    let request = TranslationRequest {
                        statements: pending,
                        functions: self.functions.clone(),
                    };
                    let response = translator.translate(&request)?;

                    for result in response.results {
                        if !sent.contains(&result.id) {
                            tracing::warn!(id = result.id, "translation response names an id that was not requested");
                            continue;
                        }
                        let index = result.id as usize;
                        let statement = &self.statements[index];
                        match parse_snippet(&result.exec, interner) {
                            Ok(snippet) => {
                                cache.insert(statement.to_string(), result.exec);
                                resolutions[index] = Resolution::Resolved(snippet);
                            }
                            Err(err) => {
                                tracing::warn!(id = result.id, statement = %statement, error = %err, "translated snippet rejected");
                                resolutions[index] = Resolution::Unresolved {
                                    reason: format!("translated snippet rejected: {err}"),
                                };
                            }
                        }
                    }
                }
                None => {
                    tracing::warn!(
                        count = pending.len(),
                        "no translator configured; uncached statements stay unresolved"
                    );
                    for request in &pending {
                        resolutions[request.id as usize] = Resolution::Unresolved {
                            reason: "not cached and no translator is configured".to_owned(),
                        };
                    }
                }
            }
        }

        cache.save()?;

        Ok(ResolvedInstructions {
            entries: resolutions,
        })
    }
}

/// Outcome of resolving one statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Resolved(Snippet),
    Unresolved { reason: String },
}

/// Run-phase view: frozen map from id to snippet.
#[derive(Debug, Default)]
pub struct ResolvedInstructions {
    entries: Vec<Resolution>,
}

impl ResolvedInstructions {
    /// No statements at all; for programs without `$instruct`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: InstructionId) -> Option<&Resolution> {
        self.entries.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of statements that have a snippet.
    pub fn resolved_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|resolution| matches!(resolution, Resolution::Resolved(_)))
            .count()
    }
}
