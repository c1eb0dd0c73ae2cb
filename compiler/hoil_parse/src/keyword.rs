//! Statement keywords.

use std::fmt;

/// Statement keywords, written with the `$` sentinel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Keyword {
    Decl,
    Assign,
    BranchBegin,
    If,
    IfEnd,
    Elif,
    ElifEnd,
    ElseBegin,
    ElseEnd,
    BranchEnd,
    OpenScope,
    CloseScope,
    While,
    WhileEnd,
    Break,
    Continue,
    Instruct,
    FuncDecl,
    FuncDeclEnd,
    Return,
    Call,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Keyword> {
        Some(match word {
            "$decl" => Keyword::Decl,
            "$assign" => Keyword::Assign,
            "$branch_begin" => Keyword::BranchBegin,
            "$if" => Keyword::If,
            "$if_end" => Keyword::IfEnd,
            "$elif" => Keyword::Elif,
            "$elif_end" => Keyword::ElifEnd,
            "$else_begin" => Keyword::ElseBegin,
            "$else_end" => Keyword::ElseEnd,
            "$branch_end" => Keyword::BranchEnd,
            "$open_scope" => Keyword::OpenScope,
            "$close_scope" => Keyword::CloseScope,
            "$while" => Keyword::While,
            "$while_end" => Keyword::WhileEnd,
            "$break" => Keyword::Break,
            "$continue" => Keyword::Continue,
            "$instruct" => Keyword::Instruct,
            "$func_decl" => Keyword::FuncDecl,
            "$func_decl_end" => Keyword::FuncDeclEnd,
            "$return" => Keyword::Return,
            "$call" => Keyword::Call,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Decl => "$decl",
            Keyword::Assign => "$assign",
            Keyword::BranchBegin => "$branch_begin",
            Keyword::If => "$if",
            Keyword::IfEnd => "$if_end",
            Keyword::Elif => "$elif",
            Keyword::ElifEnd => "$elif_end",
            Keyword::ElseBegin => "$else_begin",
            Keyword::ElseEnd => "$else_end",
            Keyword::BranchEnd => "$branch_end",
            Keyword::OpenScope => "$open_scope",
            Keyword::CloseScope => "$close_scope",
            Keyword::While => "$while",
            Keyword::WhileEnd => "$while_end",
            Keyword::Break => "$break",
            Keyword::Continue => "$continue",
            Keyword::Instruct => "$instruct",
            Keyword::FuncDecl => "$func_decl",
            Keyword::FuncDeclEnd => "$func_decl_end",
            Keyword::Return => "$return",
            Keyword::Call => "$call",
        }
    }

    /// Keywords that end a region. A body stops at the first one it meets.
    pub fn is_closer(self) -> bool {
        matches!(
            self,
            Keyword::IfEnd
                | Keyword::ElifEnd
                | Keyword::ElseEnd
                | Keyword::BranchEnd
                | Keyword::CloseScope
                | Keyword::WhileEnd
                | Keyword::FuncDeclEnd
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
