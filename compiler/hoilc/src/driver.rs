//! Build, resolve, run.

use std::fs;
use std::path::Path;

use hoil_bridge::{FunctionSignature, InstructionTable, SnippetCache, Translator};
use hoil_eval::{host::Capability, stdout_handler, Host, Interpreter, ScopeStats, SimulatedArm};
use hoil_ir::StringInterner;
use hoil_parse::BuildContext;

use crate::{HoilError, RunConfig};

/// Summary of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// `$instruct` statements in the program.
    pub statements: usize,
    /// Statements that had a snippet before the run started.
    pub resolved: usize,
    pub scope_stats: ScopeStats,
}

/// Run the program at `path` on a simulated arm that prints to stdout.
pub fn run_file(path: &Path, config: &RunConfig) -> Result<RunReport, HoilError> {
    let source = fs::read_to_string(path).map_err(|source| HoilError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let output = stdout_handler();
    let mut arm = if config.demo_scene {
        SimulatedArm::with_demo_scene(output)
    } else {
        SimulatedArm::new(output)
    };
    let mut cache = match &config.cache_path {
        Some(path) => SnippetCache::load(path)?,
        None => SnippetCache::in_memory(),
    };
    let translator = config.translator.build();

    run_source(&source, &mut cache, translator.as_deref(), &mut arm)
}

/// Run bytecode source against `host`.
///
/// Every statement is resolved before the first node runs, so a failing
/// translator stops the program before any host command is issued.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn run_source(
    source: &str,
    cache: &mut SnippetCache,
    translator: Option<&dyn Translator>,
    host: &mut dyn Host,
) -> Result<RunReport, HoilError> {
    let interner = StringInterner::new();
    let mut instructions = InstructionTable::new();
    let program = hoil_parse::build(
        source,
        &mut BuildContext {
            interner: &interner,
            instructions: &mut instructions,
        },
    )?;

    // User functions were described while building and take precedence.
    for capability in Capability::ALL {
        instructions.describe_function(FunctionSignature::new(
            capability.name(),
            capability.params().iter().copied(),
        ));
    }

    let statements = instructions.len();
    let resolved = instructions.resolve(cache, translator, &interner)?;
    tracing::debug!(
        statements,
        resolved = resolved.resolved_count(),
        "instructions resolved"
    );

    let mut interpreter = Interpreter::new(&interner, &resolved, host);
    interpreter.run_program(&program)?;

    Ok(RunReport {
        statements,
        resolved: resolved.resolved_count(),
        scope_stats: interpreter.scope_stats(),
    })
}
