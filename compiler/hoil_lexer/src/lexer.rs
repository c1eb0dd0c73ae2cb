//! Token-at-a-time expression lexer.

use hoil_ir::{Expr, Literal, Name, Op, StringInterner, Target, Token, TokenKind};

use crate::scan::{item_end, split_top_level, strip_variable};
use crate::LexError;

/// Lazily lexes one expression.
///
/// Each call to [`Lexer::next_token`] scans exactly one item. After an error
/// the lexer is exhausted.
pub struct Lexer<'src, 'i> {
    source: &'src str,
    pos: usize,
    done: bool,
    interner: &'i StringInterner,
}

impl<'src, 'i> Lexer<'src, 'i> {
    pub fn new(source: &'src str, interner: &'i StringInterner) -> Self {
        Lexer {
            source,
            pos: 0,
            done: false,
            interner,
        }
    }

    /// Produce the next token, or `None` at end of input.
    ///
    /// Empty items (`a;;b`, a trailing `;`) are skipped.
    pub fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        while !self.done {
            let start = self.pos;
            let end = match item_end(self.source, start, b';') {
                Ok(end) => end,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            if end >= self.source.len() {
                self.done = true;
            } else {
                self.pos = end + 1;
            }

            let item = self.source[start..end].trim();
            if item.is_empty() {
                continue;
            }
            let token = classify(item, self.interner);
            if token.is_err() {
                self.done = true;
            }
            return Some(token);
        }
        None
    }
}

impl Iterator for Lexer<'_, '_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Lex a whole expression.
pub fn lex_expr(source: &str, interner: &StringInterner) -> Result<Expr, LexError> {
    let tokens = Lexer::new(source, interner).collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::new(source.trim(), tokens))
}

/// Classify one item. Order: variable, string, call, array index, number,
/// boolean, operator.
fn classify(item: &str, interner: &StringInterner) -> Result<Token, LexError> {
    let kind = if item.starts_with('%') && item != "%" {
        let name = item
            .strip_prefix('%')
            .and_then(|rest| rest.strip_suffix('%'))
            .filter(|name| !name.is_empty() && !name.contains('%'))
            .ok_or_else(|| LexError::MalformedVariable {
                item: item.to_owned(),
            })?;
        TokenKind::Variable(interner.intern(name))
    } else if let Some(rest) = item.strip_prefix('"') {
        let text = rest
            .strip_suffix('"')
            .ok_or_else(|| LexError::UnterminatedString {
                item: item.to_owned(),
            })?;
        TokenKind::Literal(Literal::Str(text.into()))
    } else if item.starts_with('(') {
        lex_call(item, interner)?
    } else if item.starts_with("#[") {
        let (array, index) = lex_index(item, interner)?;
        TokenKind::ArrayIndex {
            array,
            index: Box::new(index),
        }
    } else if let Some(n) = parse_number(item) {
        TokenKind::Literal(Literal::Number(n))
    } else if item == "true" {
        TokenKind::Literal(Literal::Bool(true))
    } else if item == "false" {
        TokenKind::Literal(Literal::Bool(false))
    } else {
        TokenKind::Operator(Op::from_spelling(item))
    };
    Ok(Token::new(item, kind))
}

/// `(callee,arg1,arg2,...)`
fn lex_call(item: &str, interner: &StringInterner) -> Result<TokenKind, LexError> {
    let malformed = |reason| LexError::MalformedCall {
        item: item.to_owned(),
        reason,
    };
    let inner = item
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| malformed("trailing text after `)`"))?;

    let parts = split_top_level(inner, b',')?;
    let callee = strip_variable(parts[0]);
    if callee.is_empty() {
        return Err(malformed("missing callee"));
    }

    let mut args = Vec::with_capacity(parts.len() - 1);
    for part in &parts[1..] {
        if part.is_empty() {
            return Err(malformed("empty argument"));
        }
        args.push(lex_expr(part, interner)?);
    }

    Ok(TokenKind::NestedCall {
        callee: interner.intern(callee),
        args,
    })
}

/// Lex an assignment target: a variable name, bare or `%`-wrapped, or an
/// array element `#[array,index]`.
pub fn lex_target(text: &str, interner: &StringInterner) -> Result<Target, LexError> {
    let text = text.trim();
    if text.starts_with("#[") {
        let (array, index) = lex_index(text, interner)?;
        return Ok(Target::Element { array, index });
    }
    let name = strip_variable(text);
    if name.is_empty() || name.contains(|c: char| c.is_whitespace() || matches!(c, '%' | ';' | '"')) {
        return Err(LexError::MalformedVariable {
            item: text.to_owned(),
        });
    }
    Ok(Target::Variable(interner.intern(name)))
}

/// `#[array,index]`
fn lex_index(item: &str, interner: &StringInterner) -> Result<(Name, Expr), LexError> {
    let malformed = |reason| LexError::MalformedIndex {
        item: item.to_owned(),
        reason,
    };
    let inner = item
        .strip_prefix("#[")
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| malformed("trailing text after `]`"))?;

    let parts = split_top_level(inner, b',')?;
    let [array, index] = parts.as_slice() else {
        return Err(malformed("expected `#[array,index]`"));
    };
    let array = strip_variable(array);
    if array.is_empty() {
        return Err(malformed("missing array name"));
    }
    if index.is_empty() {
        return Err(malformed("missing index expression"));
    }

    Ok((interner.intern(array), lex_expr(index, interner)?))
}

/// Numeric spellings start with a digit, or with a sign or `.` followed by a
/// digit, so `inf`, `nan` and a bare `-` stay operators.
fn parse_number(item: &str) -> Option<f64> {
    let mut chars = item.chars();
    let first = chars.next()?;
    let numeric = first.is_ascii_digit()
        || (matches!(first, '-' | '+' | '.')
            && chars.next().is_some_and(|c| c.is_ascii_digit() || c == '.'));
    if !numeric {
        return None;
    }
    item.parse::<f64>().ok()
}

#[cfg(test)]
mod tests;
