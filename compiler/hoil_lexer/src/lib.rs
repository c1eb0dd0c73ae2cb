//! Lexer for HOIL postfix expressions.
//!
//! An expression is a sequence of items separated by `;`:
//!
//! ```text
//! %a%;%b%;+              a + b
//! %a%;[                  -a
//! (PositionOf,"cup")     nested call
//! #[%pos%,2];0.1;+       pos[2] + 0.1
//! ```
//!
//! Separators inside string literals, call regions and array regions do not
//! split. The lexer produces one [`Token`] per request; [`lex_expr`] drains it
//! into an [`Expr`].

mod error;
mod lexer;
mod scan;

pub use error::LexError;
pub use lexer::{lex_expr, lex_target, Lexer};
pub use scan::{split_top_level, strip_variable};
