#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use hoil_bridge::InstructionTable;
use hoil_ir::{InstructionId, StringInterner, ValueKind};
use pretty_assertions::assert_eq;

use crate::{build, BuildContext, BuildError, Keyword};
use hoil_ir::{Node, Program, Target};

fn try_build(source: &str) -> (Result<Program, BuildError>, InstructionTable, StringInterner) {
    let interner = StringInterner::new();
    let mut instructions = InstructionTable::new();
    let result = {
        let mut ctx = BuildContext {
            interner: &interner,
            instructions: &mut instructions,
        };
        build(source, &mut ctx)
    };
    (result, instructions, interner)
}

fn build_ok(source: &str) -> Program {
    try_build(source).0.unwrap()
}

fn build_err(source: &str) -> BuildError {
    try_build(source).0.unwrap_err()
}

// === Simple statements ===

#[test]
fn test_blank_lines_are_ignored() {
    let program = build_ok("\n   \n$decl x num 1\n\n");
    assert_eq!(program.body.len(), 1);
}

#[test]
fn test_decl_forms() {
    let (program, _, interner) = try_build(
        "$decl %x% num %a%;%b%;+\n\
         $decl items arr\n\
         $decl limit const:num 10",
    );
    let program = program.unwrap();
    let Node::Declaration(x) = &program.body[0] else {
        panic!("expected declaration");
    };
    assert_eq!(interner.lookup(x.name), "x");
    assert_eq!(x.hint.kind, ValueKind::Number);
    assert_eq!(x.init.as_ref().map(|e| e.tokens().len()), Some(3));

    let Node::Declaration(items) = &program.body[1] else {
        panic!("expected declaration");
    };
    assert_eq!(items.hint.kind, ValueKind::Array);
    assert!(items.init.is_none());

    let Node::Declaration(limit) = &program.body[2] else {
        panic!("expected declaration");
    };
    assert!(limit.hint.fixed);
}

#[test]
fn test_decl_keeps_spaces_inside_string_literals() {
    let program = build_ok("$decl greeting str \"hello  world\"");
    let Node::Declaration(decl) = &program.body[0] else {
        panic!("expected declaration");
    };
    assert_eq!(&**decl.init.as_ref().unwrap().source(), "\"hello  world\"");
}

#[test]
fn test_assign_element_target() {
    let program = build_ok("$decl p arr\n$assign #[%p%,0] 1.5");
    let Node::Assignment(assign) = &program.body[1] else {
        panic!("expected assignment");
    };
    assert!(matches!(assign.target, Target::Element { .. }));
}

#[test]
fn test_call_arguments_split_on_top_level_commas() {
    let (program, _, interner) = try_build("$call MoveTo (PositionOf,\"cup\");#[x,0],0,0.5");
    let program = program.unwrap();
    let Node::Call(call) = &program.body[0] else {
        panic!("expected call");
    };
    assert_eq!(interner.lookup(call.callee), "MoveTo");
    assert_eq!(call.args.len(), 3);
}

#[test]
fn test_instruct_submits_statement() {
    let (program, instructions, _) = try_build(
        "$instruct \"pick up the cup\"\n$instruct put it on table2",
    );
    let program = program.unwrap();
    assert_eq!(instructions.len(), 2);
    assert_eq!(instructions.statement(InstructionId::new(0)), Some("pick up the cup"));
    let Node::Instruct(node) = &program.body[1] else {
        panic!("expected instruct");
    };
    assert_eq!(node.id, InstructionId::new(1));
    assert_eq!(&*node.statement, "put it on table2");
}

// === Regions ===

#[test]
fn test_full_branch() {
    let program = build_ok(
        "$branch_begin\n\
         $if %x%;1;==\n\
         $decl y num 1\n\
         $if_end\n\
         $elif %x%;2;==\n\
         $decl y num 2\n\
         $elif_end\n\
         $elif %x%;3;==\n\
         $elif_end\n\
         $else_begin\n\
         $decl y num 0\n\
         $else_end\n\
         $branch_end",
    );
    let Node::Branch(branch) = &program.body[0] else {
        panic!("expected branch");
    };
    assert_eq!(branch.arms.len(), 3);
    assert!(branch.arms[2].body.is_empty());
    assert_eq!(branch.otherwise.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_nested_regions() {
    let program = build_ok(
        "$while %i%;3;<\n\
         $open_scope\n\
         $branch_begin\n\
         $if %i%;1;==\n\
         $continue\n\
         $if_end\n\
         $branch_end\n\
         $close_scope\n\
         $break\n\
         $while_end\n\
         $decl done bool true",
    );
    assert_eq!(program.body.len(), 2);
    let Node::Loop(loop_node) = &program.body[0] else {
        panic!("expected loop");
    };
    assert_eq!(loop_node.body.len(), 2);
    assert!(matches!(loop_node.body[0], Node::Scoped(_)));
    assert!(matches!(loop_node.body[1], Node::Break));
}

#[test]
fn test_while_without_condition_defaults_to_true() {
    let program = build_ok("$while\n$break\n$while_end");
    let Node::Loop(loop_node) = &program.body[0] else {
        panic!("expected loop");
    };
    assert_eq!(&**loop_node.condition.expr.source(), "true");
}

#[test]
fn test_function_declaration() {
    let (program, instructions, interner) = try_build(
        "$func_decl grab num $param what:str height\n\
         $return %height%\n\
         $func_decl_end",
    );
    let program = program.unwrap();
    let Node::Function(function) = &program.body[0] else {
        panic!("expected function");
    };
    assert_eq!(interner.lookup(function.name), "grab");
    assert_eq!(function.return_hint.map(|h| h.kind), Some(ValueKind::Number));
    assert_eq!(function.params.len(), 2);
    assert_eq!(function.params[0].hint.kind, ValueKind::Str);
    assert_eq!(function.params[1].hint.kind, ValueKind::Any);
    assert_eq!(instructions.functions()[0].params, vec!["what", "height"]);
}

// === Errors ===

#[test]
fn test_unknown_statement() {
    assert_eq!(
        build_err("$decl x num 1\nprint x"),
        BuildError::UnknownStatement {
            line: 2,
            text: "print x".to_owned()
        }
    );
    assert!(matches!(
        build_err("$goto 10"),
        BuildError::UnknownStatement { line: 1, .. }
    ));
}

#[test]
fn test_unterminated_region_reports_opener() {
    assert_eq!(
        build_err("$decl x num 1\n$while true\n$decl x num 2"),
        BuildError::Unterminated {
            line: 2,
            opened: Keyword::While
        }
    );
    assert_eq!(
        build_err("$branch_begin\n$if true\n$if_end"),
        BuildError::Unterminated {
            line: 1,
            opened: Keyword::BranchBegin
        }
    );
}

#[test]
fn test_closer_must_match_opener() {
    assert_eq!(
        build_err("$open_scope\n$while_end"),
        BuildError::MismatchedClose {
            line: 2,
            expected: Keyword::CloseScope,
            found: Keyword::WhileEnd
        }
    );
    assert!(matches!(
        build_err("$branch_begin\n$if true\n$elif_end\n$branch_end"),
        BuildError::MismatchedClose {
            expected: Keyword::IfEnd,
            ..
        }
    ));
}

#[test]
fn test_stray_closer_at_top_level() {
    assert_eq!(
        build_err("$close_scope"),
        BuildError::UnexpectedClose {
            line: 1,
            found: Keyword::CloseScope
        }
    );
}

#[test]
fn test_branch_arm_order() {
    for source in [
        "$branch_begin\n$elif true\n$elif_end\n$branch_end",
        "$branch_begin\n$if true\n$if_end\n$if true\n$if_end\n$branch_end",
        "$branch_begin\n$if true\n$if_end\n$else_begin\n$else_end\n$elif true\n$elif_end\n$branch_end",
        "$branch_begin\n$if true\n$if_end\n$else_begin\n$else_end\n$else_begin\n$else_end\n$branch_end",
        "$branch_begin\n$branch_end",
        "$branch_begin\n$decl x num 1\n$branch_end",
        "$if true\n$if_end",
    ] {
        assert!(
            matches!(build_err(source), BuildError::BranchArmOrder { .. }),
            "{source}"
        );
    }
}

#[test]
fn test_jump_outside_loop() {
    assert_eq!(
        build_err("$break"),
        BuildError::JumpOutsideLoop {
            line: 1,
            keyword: Keyword::Break
        }
    );
    // A function body does not inherit the enclosing loop
    assert!(matches!(
        build_err("$while\n$func_decl f\n$continue\n$func_decl_end\n$while_end"),
        BuildError::JumpOutsideLoop { line: 3, .. }
    ));
}

#[test]
fn test_return_outside_function() {
    assert_eq!(
        build_err("$return 1"),
        BuildError::ReturnOutsideFunction { line: 1 }
    );
}

#[test]
fn test_operand_errors() {
    assert!(matches!(
        build_err("$decl x"),
        BuildError::MissingOperand { operand: "type hint", .. }
    ));
    assert!(matches!(
        build_err("$decl x int 1"),
        BuildError::UnknownTypeHint { .. }
    ));
    assert!(matches!(
        build_err("$decl x num (f,1"),
        BuildError::Lex { line: 1, .. }
    ));
    assert!(matches!(
        build_err("$branch_begin\n$if\n$if_end\n$branch_end"),
        BuildError::MissingOperand { line: 2, operand: "condition", .. }
    ));
    assert!(matches!(
        build_err("$instruct \"\""),
        BuildError::MissingOperand { operand: "statement", .. }
    ));
}

#[test]
fn test_error_line_accessor() {
    assert_eq!(build_err("\n\n$break").line(), 3);
}
