use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    /// Reserved words, keyed by their lowercase spelling.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("program", TokenKind::Program);
        map.insert("var", TokenKind::Var);
        map.insert("function", TokenKind::Function);
        map.insert("procedure", TokenKind::Procedure);
        map.insert("begin", TokenKind::Begin);
        map.insert("end", TokenKind::End);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map.insert("repeat", TokenKind::Repeat);
        map.insert("until", TokenKind::Until);
        map.insert("for", TokenKind::For);
        map.insert("to", TokenKind::To);
        map.insert("downto", TokenKind::Downto);
        map.insert("read", TokenKind::Read);
        map.insert("readln", TokenKind::ReadLn);
        map.insert("write", TokenKind::Write);
        map.insert("writeln", TokenKind::WriteLn);
        map.insert("div", TokenKind::Div);
        map.insert("mod", TokenKind::Mod);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Integer,
    Real,
    String,
    Char,
    Identifier,

    OpenParen,
    CloseParen,

    Assignment, // :=
    Equals,     // =
    NotEquals,  // <>

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Dot,
    Semicolon,
    Colon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    Program,
    Var,
    Function,
    Procedure,
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Do,
    Repeat,
    Until,
    For,
    To,
    Downto,
    Read,
    ReadLn,
    Write,
    WriteLn,
    Div,
    Mod,
    And,
    Or,
    Not,
    True,
    False,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Token {
    /// Identifier token with no source location, for trees built by hand.
    pub fn identifier(name: &str) -> Token {
        Token {
            kind: TokenKind::Identifier,
            value: String::from(name),
            span: Span::null(),
        }
    }
}
