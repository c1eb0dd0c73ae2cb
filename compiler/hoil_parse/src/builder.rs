//! Recursive region builder over a shared line cursor.

use hoil_bridge::FunctionSignature;
use hoil_ir::{
    Assignment, Block, Branch, Call, Conditional, Declaration, Expr, ExprNode, FunctionDecl,
    InstructNode, Loop, Name, Node, Param, Program, Target, TypeHint,
};
use hoil_lexer::{lex_expr, lex_target, split_top_level, LexError};

use crate::{BuildContext, BuildError, Keyword};

/// A classified, non-blank source line.
#[derive(Copy, Clone, Debug)]
struct Line<'src> {
    /// 1-based line number.
    number: usize,
    keyword: Keyword,
    /// Text after the keyword, trimmed.
    rest: &'src str,
    /// The whole trimmed line.
    text: &'src str,
}

/// How a body ended.
enum BlockEnd {
    Eof,
    Closer { keyword: Keyword, line: usize },
}

pub(crate) struct Builder<'src, 'c, 'a> {
    source: &'src str,
    lines: Vec<Line<'src>>,
    pos: usize,
    ctx: &'c mut BuildContext<'a>,
    /// Loops enclosing the current statement; reset inside function bodies.
    loop_depth: usize,
    function_depth: usize,
}

impl<'src, 'c, 'a> Builder<'src, 'c, 'a> {
    pub(crate) fn new(source: &'src str, ctx: &'c mut BuildContext<'a>) -> Self {
        Builder {
            source,
            lines: Vec::new(),
            pos: 0,
            ctx,
            loop_depth: 0,
            function_depth: 0,
        }
    }

    pub(crate) fn build_program(mut self) -> Result<Program, BuildError> {
        self.lines = classify_lines(self.source)?;
        tracing::debug!(lines = self.lines.len(), "building program");

        let (body, end) = self.build_block()?;
        if let BlockEnd::Closer { keyword, line } = end {
            return Err(BuildError::UnexpectedClose {
                line,
                found: keyword,
            });
        }
        Ok(Program { body })
    }

    fn next_line(&mut self) -> Option<Line<'src>> {
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    /// Build statements until a closing keyword (consumed and returned) or
    /// the end of input.
    fn build_block(&mut self) -> Result<(Block, BlockEnd), BuildError> {
        let mut block = Vec::new();
        while let Some(line) = self.next_line() {
            if line.keyword.is_closer() {
                return Ok((
                    block,
                    BlockEnd::Closer {
                        keyword: line.keyword,
                        line: line.number,
                    },
                ));
            }
            block.push(self.build_statement(line)?);
        }
        Ok((block, BlockEnd::Eof))
    }

    fn expect_close(
        &self,
        end: BlockEnd,
        opened: Line<'src>,
        expected: Keyword,
    ) -> Result<(), BuildError> {
        match end {
            BlockEnd::Closer { keyword, .. } if keyword == expected => Ok(()),
            BlockEnd::Closer { keyword, line } => Err(BuildError::MismatchedClose {
                line,
                expected,
                found: keyword,
            }),
            BlockEnd::Eof => Err(BuildError::Unterminated {
                line: opened.number,
                opened: opened.keyword,
            }),
        }
    }

    fn build_statement(&mut self, line: Line<'src>) -> Result<Node, BuildError> {
        tracing::trace!(line = line.number, keyword = %line.keyword, "statement");
        match line.keyword {
            Keyword::Decl => self.build_decl(line),
            Keyword::Assign => self.build_assign(line),
            Keyword::BranchBegin => self.build_branch(line),
            Keyword::OpenScope => {
                let (body, end) = self.build_block()?;
                self.expect_close(end, line, Keyword::CloseScope)?;
                Ok(Node::Scoped(body))
            }
            Keyword::While => self.build_loop(line),
            Keyword::Break | Keyword::Continue => {
                if self.loop_depth == 0 {
                    return Err(BuildError::JumpOutsideLoop {
                        line: line.number,
                        keyword: line.keyword,
                    });
                }
                Ok(if line.keyword == Keyword::Break {
                    Node::Break
                } else {
                    Node::Continue
                })
            }
            Keyword::Instruct => self.build_instruct(line),
            Keyword::FuncDecl => self.build_function(line),
            Keyword::Return => {
                if self.function_depth == 0 {
                    return Err(BuildError::ReturnOutsideFunction { line: line.number });
                }
                let value = if line.rest.is_empty() {
                    None
                } else {
                    Some(self.expr(line, line.rest)?)
                };
                Ok(Node::Return(value))
            }
            Keyword::Call => self.build_call(line),
            Keyword::If | Keyword::Elif | Keyword::ElseBegin => Err(BuildError::BranchArmOrder {
                line: line.number,
                reason: "branch arm outside of `$branch_begin`",
            }),
            Keyword::IfEnd
            | Keyword::ElifEnd
            | Keyword::ElseEnd
            | Keyword::BranchEnd
            | Keyword::CloseScope
            | Keyword::WhileEnd
            | Keyword::FuncDeclEnd => Err(BuildError::UnexpectedClose {
                line: line.number,
                found: line.keyword,
            }),
        }
    }

    // === Statements ===

    /// `$decl name hint [expr]`
    fn build_decl(&mut self, line: Line<'src>) -> Result<Node, BuildError> {
        let (name, rest) = split_word(line.rest);
        if name.is_empty() {
            return Err(missing(line, "variable name"));
        }
        let (hint, init) = split_word(rest);
        if hint.is_empty() {
            return Err(missing(line, "type hint"));
        }
        let declaration = Declaration {
            name: self.variable_name(line, name)?,
            hint: parse_hint(line, hint)?,
            init: if init.is_empty() {
                None
            } else {
                Some(self.expr(line, init)?)
            },
        };
        Ok(Node::Declaration(declaration))
    }

    /// `$assign target expr`
    fn build_assign(&mut self, line: Line<'src>) -> Result<Node, BuildError> {
        let (target, value) = split_word(line.rest);
        if target.is_empty() {
            return Err(missing(line, "target"));
        }
        if value.is_empty() {
            return Err(missing(line, "value"));
        }
        let target = lex_target(target, self.ctx.interner).map_err(|source| lex_error(line, source))?;
        Ok(Node::Assignment(Assignment {
            target,
            value: self.expr(line, value)?,
        }))
    }

    /// `$branch_begin`, one `$if` arm, any `$elif` arms, an optional
    /// `$else_begin` arm, `$branch_end`.
    fn build_branch(&mut self, open: Line<'src>) -> Result<Node, BuildError> {
        let mut arms: Vec<Conditional> = Vec::new();
        let mut otherwise: Option<Block> = None;

        loop {
            let Some(line) = self.next_line() else {
                return Err(BuildError::Unterminated {
                    line: open.number,
                    opened: open.keyword,
                });
            };
            let order = |reason| BuildError::BranchArmOrder {
                line: line.number,
                reason,
            };
            match line.keyword {
                Keyword::If if arms.is_empty() => arms.push(self.build_arm(line, Keyword::IfEnd)?),
                Keyword::If => return Err(order("a branch has exactly one `$if`, and it comes first")),
                Keyword::Elif if arms.is_empty() => return Err(order("`$elif` before `$if`")),
                Keyword::Elif if otherwise.is_some() => {
                    return Err(order("`$elif` after `$else_begin`"));
                }
                Keyword::Elif => arms.push(self.build_arm(line, Keyword::ElifEnd)?),
                Keyword::ElseBegin if arms.is_empty() => {
                    return Err(order("`$else_begin` before `$if`"));
                }
                Keyword::ElseBegin if otherwise.is_some() => {
                    return Err(order("a branch has at most one `$else_begin`"));
                }
                Keyword::ElseBegin => {
                    let (body, end) = self.build_block()?;
                    self.expect_close(end, line, Keyword::ElseEnd)?;
                    otherwise = Some(body);
                }
                Keyword::BranchEnd if arms.is_empty() => return Err(order("branch without `$if`")),
                Keyword::BranchEnd => return Ok(Node::Branch(Branch { arms, otherwise })),
                _ => {
                    return Err(order(
                        "only arms and `$branch_end` may appear directly inside a branch",
                    ));
                }
            }
        }
    }

    fn build_arm(&mut self, open: Line<'src>, close: Keyword) -> Result<Conditional, BuildError> {
        if open.rest.is_empty() {
            return Err(missing(open, "condition"));
        }
        let condition = self.expr(open, open.rest)?;
        let (body, end) = self.build_block()?;
        self.expect_close(end, open, close)?;
        Ok(Conditional {
            condition: ExprNode::new(condition),
            body,
        })
    }

    /// `$while [cond]` ... `$while_end`; the condition defaults to `true`.
    fn build_loop(&mut self, open: Line<'src>) -> Result<Node, BuildError> {
        let condition = if open.rest.is_empty() {
            self.expr(open, "true")?
        } else {
            self.expr(open, open.rest)?
        };

        self.loop_depth += 1;
        let body = self.build_block();
        self.loop_depth -= 1;

        let (body, end) = body?;
        self.expect_close(end, open, Keyword::WhileEnd)?;
        Ok(Node::Loop(Loop {
            condition: ExprNode::new(condition),
            body,
        }))
    }

    /// `$instruct text`, with surrounding quotes stripped.
    fn build_instruct(&mut self, line: Line<'src>) -> Result<Node, BuildError> {
        let text = line.rest;
        let text = text
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text)
            .trim();
        if text.is_empty() {
            return Err(missing(line, "statement"));
        }
        let id = self.ctx.instructions.submit(text);
        Ok(Node::Instruct(InstructNode::new(id, text)))
    }

    /// `$func_decl name [hint] [$param p[:hint] ...]` ... `$func_decl_end`
    fn build_function(&mut self, open: Line<'src>) -> Result<Node, BuildError> {
        let mut words = open.rest.split_whitespace();
        let Some(name) = words.next() else {
            return Err(missing(open, "function name"));
        };
        let name = self.variable_name(open, name)?;

        let mut return_hint = None;
        let mut params = Vec::new();
        let mut in_params = false;
        for word in words {
            if word == "$param" {
                in_params = true;
            } else if in_params {
                params.push(self.param(open, word)?);
            } else if return_hint.is_none() {
                return_hint = Some(parse_hint(open, word)?);
            } else {
                return Err(BuildError::UnknownStatement {
                    line: open.number,
                    text: open.text.to_owned(),
                });
            }
        }

        let interner = self.ctx.interner;
        self.ctx.instructions.describe_function(FunctionSignature::new(
            interner.lookup(name),
            params.iter().map(|p: &Param| interner.lookup(p.name)),
        ));

        let enclosing_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.function_depth += 1;
        let body = self.build_block();
        self.function_depth -= 1;
        self.loop_depth = enclosing_loops;

        let (body, end) = body?;
        self.expect_close(end, open, Keyword::FuncDeclEnd)?;
        Ok(Node::Function(FunctionDecl {
            name,
            return_hint,
            params,
            body,
        }))
    }

    /// `$call name [arg{,arg}]`
    fn build_call(&mut self, line: Line<'src>) -> Result<Node, BuildError> {
        let (callee, args) = split_word(line.rest);
        if callee.is_empty() {
            return Err(missing(line, "function name"));
        }
        let callee = self.variable_name(line, callee)?;
        let mut exprs = Vec::new();
        if !args.is_empty() {
            for arg in split_top_level(args, b',').map_err(|source| lex_error(line, source))? {
                if arg.is_empty() {
                    return Err(missing(line, "argument"));
                }
                exprs.push(self.expr(line, arg)?);
            }
        }
        Ok(Node::Call(Call {
            callee,
            args: exprs,
        }))
    }

    // === Operands ===

    fn expr(&self, line: Line<'src>, text: &str) -> Result<Expr, BuildError> {
        lex_expr(text, self.ctx.interner).map_err(|source| lex_error(line, source))
    }

    fn variable_name(&self, line: Line<'src>, text: &str) -> Result<Name, BuildError> {
        match lex_target(text, self.ctx.interner) {
            Ok(Target::Variable(name)) => Ok(name),
            Ok(Target::Element { .. }) => Err(lex_error(
                line,
                LexError::MalformedVariable {
                    item: text.to_owned(),
                },
            )),
            Err(source) => Err(lex_error(line, source)),
        }
    }

    /// `name` or `name:hint`
    fn param(&self, line: Line<'src>, word: &str) -> Result<Param, BuildError> {
        let (name, hint) = match word.split_once(':') {
            Some((name, hint)) => (name, parse_hint(line, hint)?),
            None => (word, TypeHint::ANY),
        };
        Ok(Param {
            name: self.variable_name(line, name)?,
            hint,
        })
    }
}

fn classify_lines(source: &str) -> Result<Vec<Line<'_>>, BuildError> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let number = index + 1;
        let (word, rest) = split_word(text);
        let keyword = Keyword::from_word(word).ok_or_else(|| BuildError::UnknownStatement {
            line: number,
            text: text.to_owned(),
        })?;
        lines.push(Line {
            number,
            keyword,
            rest,
            text,
        });
    }
    Ok(lines)
}

fn parse_hint(line: Line<'_>, text: &str) -> Result<TypeHint, BuildError> {
    TypeHint::parse(text).ok_or_else(|| BuildError::UnknownTypeHint {
        line: line.number,
        hint: text.to_owned(),
    })
}

fn missing(line: Line<'_>, operand: &'static str) -> BuildError {
    BuildError::MissingOperand {
        line: line.number,
        keyword: line.keyword,
        operand,
    }
}

fn lex_error(line: Line<'_>, source: LexError) -> BuildError {
    BuildError::Lex {
        line: line.number,
        source,
    }
}

/// Split off the first whitespace-delimited word.
fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests;
