//! Translation service contract.

use serde::{Deserialize, Serialize};

use crate::{BridgeError, FunctionSignature};

/// One statement to translate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRequest {
    pub id: u32,
    pub stmt: String,
}

/// The batch sent to a translation service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub statements: Vec<StatementRequest>,
    /// Functions a snippet may call: user functions and host capabilities.
    pub functions: Vec<FunctionSignature>,
}

/// A translated statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedStatement {
    pub id: u32,
    pub exec: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub results: Vec<TranslatedStatement>,
}

/// A service that turns natural-language statements into snippets.
///
/// Called at most once per run, with every uncached statement in one batch.
pub trait Translator {
    fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, BridgeError>;
}
