//! Snippet parser.
//!
//! A snippet is one opcode per line:
//!
//! ```text
//! decl <name> [<expr>]
//! assign <target> <expr>
//! read <name>
//! call <name> [<arg>{,<arg>}]
//! ```
//!
//! Operands are HOIL postfix expressions. Blank lines and lines starting with
//! `#` are ignored.

use hoil_ir::{HostOp, Snippet, StringInterner};
use hoil_lexer::{lex_expr, lex_target, split_top_level, strip_variable, LexError};

use crate::SnippetError;

pub fn parse_snippet(source: &str, interner: &StringInterner) -> Result<Snippet, SnippetError> {
    let mut ops = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() || (text.starts_with('#') && !text.starts_with("#[")) {
            continue;
        }
        ops.push(parse_op(text, line, interner)?);
    }
    if ops.is_empty() {
        return Err(SnippetError::Empty);
    }
    Ok(Snippet::new(source, ops))
}

fn parse_op(text: &str, line: usize, interner: &StringInterner) -> Result<HostOp, SnippetError> {
    let (opcode, rest) = split_word(text);
    let lex = |source: LexError| SnippetError::Lex { line, source };
    let missing = |opcode, operand| SnippetError::MissingOperand {
        line,
        opcode,
        operand,
    };

    match opcode {
        "decl" => {
            let (name, value) = split_word(rest);
            if name.is_empty() {
                return Err(missing("decl", "name"));
            }
            let value = if value.is_empty() {
                None
            } else {
                Some(lex_expr(value, interner).map_err(lex)?)
            };
            Ok(HostOp::Declare {
                name: interner.intern(strip_variable(name)),
                value,
            })
        }
        "assign" => {
            let (target, value) = split_word(rest);
            if target.is_empty() {
                return Err(missing("assign", "target"));
            }
            if value.is_empty() {
                return Err(missing("assign", "value"));
            }
            Ok(HostOp::Assign {
                target: lex_target(target, interner).map_err(lex)?,
                value: lex_expr(value, interner).map_err(lex)?,
            })
        }
        "read" => {
            if rest.is_empty() {
                return Err(missing("read", "name"));
            }
            Ok(HostOp::Read {
                name: interner.intern(strip_variable(rest)),
            })
        }
        "call" => {
            let (callee, args) = split_word(rest);
            if callee.is_empty() {
                return Err(missing("call", "function name"));
            }
            let args = if args.is_empty() {
                Vec::new()
            } else {
                split_top_level(args, b',')
                    .map_err(lex)?
                    .into_iter()
                    .map(|arg| lex_expr(arg, interner))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(lex)?
            };
            Ok(HostOp::Call {
                callee: interner.intern(strip_variable(callee)),
                args,
            })
        }
        _ => Err(SnippetError::UnknownOpcode {
            line,
            opcode: opcode.to_owned(),
        }),
    }
}

/// Split off the first whitespace-delimited word.
fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}
