//! End-to-end runs through the driver: build, resolve through a cache and a
//! scripted translator, run on the simulated arm.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::cell::RefCell;
use std::path::Path;

use hoil_bridge::{
    BridgeError, SnippetCache, TranslatedStatement, TranslationRequest, TranslationResponse,
    Translator,
};
use hoil_eval::host::Command;
use hoil_eval::{buffer_handler, RuntimeError, SharedPrintHandler, SimulatedArm};
use hoilc::{run_file, run_source, HoilError, RunConfig};
use pretty_assertions::assert_eq;

/// Answers from a fixed table and keeps every request it received.
struct ScriptedTranslator {
    answers: Vec<(&'static str, &'static str)>,
    requests: RefCell<Vec<TranslationRequest>>,
}

impl ScriptedTranslator {
    fn new(answers: &[(&'static str, &'static str)]) -> Self {
        ScriptedTranslator {
            answers: answers.to_vec(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Translator for ScriptedTranslator {
    fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, BridgeError> {
        self.requests.borrow_mut().push(request.clone());
        let results = request
            .statements
            .iter()
            .filter_map(|s| {
                self.answers
                    .iter()
                    .find(|(stmt, _)| *stmt == s.stmt)
                    .map(|(_, exec)| TranslatedStatement {
                        id: s.id,
                        exec: (*exec).to_owned(),
                    })
            })
            .collect();
        Ok(TranslationResponse { results })
    }
}

struct Unreachable;

impl Translator for Unreachable {
    fn translate(&self, _: &TranslationRequest) -> Result<TranslationResponse, BridgeError> {
        Err(BridgeError::Transport("connection refused".to_owned()))
    }
}

const PICK_AND_PLACE: &str = "\
$decl target str \"obj\"
$decl lift num 0.05
$instruct \"move above the object\"
$call MoveBy 0,0,%lift%;[
$call CloseGripper
$instruct \"pick up the object\"
$call MoveTo 0,0.5,0.5
$call OpenGripper
$call Detach %target%
$call Print \"placed {target}\"
";

const ANSWERS: &[(&str, &str)] = &[
    (
        "move above the object",
        "decl above (PositionOf,%target%)\nassign #[above,2] #[above,2];0.1;+\ncall MoveTo #[above,0],#[above,1],#[above,2]",
    ),
    ("pick up the object", "call Attach %target%"),
];

fn demo_arm() -> (SimulatedArm, SharedPrintHandler) {
    let output = buffer_handler();
    (SimulatedArm::with_demo_scene(output.clone()), output)
}

#[test]
fn test_pick_and_place() {
    let translator = ScriptedTranslator::new(ANSWERS);
    let (mut arm, output) = demo_arm();
    let mut cache = SnippetCache::in_memory();

    let report = run_source(PICK_AND_PLACE, &mut cache, Some(&translator), &mut arm).unwrap();

    assert_eq!(report.statements, 2);
    assert_eq!(report.resolved, 2);
    assert!(report.scope_stats.is_balanced());
    assert_eq!(output.lines(), vec!["placed obj"]);
    assert!(arm.attached().is_empty());
    assert!(arm.is_gripper_open());
    assert_eq!(arm.history().first(), Some(&Command::MoveTo([0.5, 0.0, 0.5])));
    assert!(arm.history().contains(&Command::Attach("obj".into())));

    let requests = translator.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].statements.len(), 2);
    assert!(requests[0].functions.iter().any(|f| f.name == "MoveTo"));
}

#[test]
fn test_second_run_is_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("instructions.json");

    let first = ScriptedTranslator::new(ANSWERS);
    let mut cache = SnippetCache::load(&path).unwrap();
    let (mut arm, _) = demo_arm();
    run_source(PICK_AND_PLACE, &mut cache, Some(&first), &mut arm).unwrap();
    assert_eq!(first.request_count(), 1);
    assert!(path.exists());

    let second = ScriptedTranslator::new(ANSWERS);
    let mut cache = SnippetCache::load(&path).unwrap();
    let (mut arm, output) = demo_arm();
    let report = run_source(PICK_AND_PLACE, &mut cache, Some(&second), &mut arm).unwrap();
    assert_eq!(second.request_count(), 0);
    assert_eq!(report.resolved, 2);
    assert_eq!(output.lines(), vec!["placed obj"]);
}

#[test]
fn test_translator_failure_stops_before_any_command() {
    let (mut arm, _) = demo_arm();
    let mut cache = SnippetCache::in_memory();
    let err = run_source(PICK_AND_PLACE, &mut cache, Some(&Unreachable), &mut arm).unwrap_err();
    assert!(matches!(err, HoilError::Bridge(BridgeError::Transport(_))));
    assert!(arm.history().is_empty());
}

#[test]
fn test_untranslated_statement_fails_when_reached() {
    let translator = ScriptedTranslator::new(&ANSWERS[..1]);
    let (mut arm, _) = demo_arm();
    let mut cache = SnippetCache::in_memory();
    let err = run_source(PICK_AND_PLACE, &mut cache, Some(&translator), &mut arm).unwrap_err();
    assert!(matches!(
        err,
        HoilError::Runtime(RuntimeError::UnresolvedStatement { .. })
    ));
    // Commands before the failing statement are not rolled back.
    assert_eq!(arm.history().len(), 3);
}

#[test]
fn test_build_error_stops_before_any_command() {
    let (mut arm, _) = demo_arm();
    let mut cache = SnippetCache::in_memory();
    let err = run_source(
        "$call OpenGripper\n$while true\n$call CloseGripper\n",
        &mut cache,
        None,
        &mut arm,
    )
    .unwrap_err();
    assert!(matches!(err, HoilError::Build(_)));
    assert!(arm.history().is_empty());
}

#[test]
fn test_program_without_instructions_needs_no_translator() {
    let (mut arm, output) = demo_arm();
    let mut cache = SnippetCache::in_memory();
    let report = run_source(
        "\
$func_decl square num $param n
$return %n%;%n%;*
$func_decl_end
$decl total num 0
$decl i num 1
$while %i%;4;<=
$assign total %total%;(square,%i%);+
$assign i %i%;1;+
$while_end
$call Print \"total {total}\"
",
        &mut cache,
        None,
        &mut arm,
    )
    .unwrap();
    assert_eq!(report.statements, 0);
    assert_eq!(output.lines(), vec!["total 30"]);
}

#[test]
fn test_run_file_reads_source() {
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("wave.hoil");
    std::fs::write(&program, "$call OpenGripper\n$call CloseGripper\n").unwrap();
    let config = RunConfig {
        cache_path: None,
        ..RunConfig::default()
    };
    let report = run_file(&program, &config).unwrap();
    assert_eq!(report.statements, 0);
}

#[test]
fn test_run_file_missing_source() {
    let config = RunConfig {
        cache_path: None,
        ..RunConfig::default()
    };
    let err = run_file(Path::new("/nonexistent/prog.hoil"), &config).unwrap_err();
    assert!(matches!(err, HoilError::Io { .. }));
    assert!(err.to_string().starts_with("cannot read `/nonexistent/prog.hoil`"));
}
