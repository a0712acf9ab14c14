use std::rc::Rc;

use log::trace;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler
}

#[derive(Clone)]
pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

// Every pattern is anchored so a match always starts at the current position.
fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("lexer patterns are valid regular expressions"),
        handler,
    }
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            patterns: vec![
                pattern(r"^\s+", skip_handler),
                pattern(r"^\{[^}]*\}", skip_handler),
                pattern(r"^\(\*(?s:.*?)\*\)", skip_handler),
                pattern(r"^//[^\n]*", skip_handler),
                pattern(r"^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
                pattern(r"^[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", real_handler),
                pattern(r"^[0-9]+[eE][+-]?[0-9]+", real_handler),
                pattern(r"^[0-9]+", integer_handler),
                pattern(r"^'([^'\n]|'')*'", string_handler),
                pattern(r"^:=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, ":=")),
                pattern(r"^<>", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "<>")),
                pattern(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
                pattern(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
                pattern(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
                pattern(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
                pattern(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Equals, "=")),
                pattern(r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
                pattern(r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
                pattern(r"^\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
                pattern(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
                pattern(r"^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
                pattern(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
                pattern(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
                pattern(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
                pattern(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
                pattern(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
            ],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Character at the current position.
    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Span of the next `len` bytes.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Rc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

fn integer_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let span = lexer.span_of(matched.len());

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Integer, matched, span));
}

fn real_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let span = lexer.span_of(matched.len());

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Real, matched, span));
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let span = lexer.span_of(matched.len());

    // Strip the quotes, then collapse doubled quotes
    let string_literal = matched[1..matched.len() - 1].replace("''", "'");
    let kind = if string_literal.chars().count() == 1 {
        TokenKind::Char
    } else {
        TokenKind::String
    };

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(kind, string_literal, span));
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let span = lexer.span_of(value.len());
    lexer.advance_n(value.len());

    if let Some(kind) = RESERVED_LOOKUP.get(value.to_ascii_lowercase().as_str()) {
        lexer.push(MK_TOKEN!(*kind, value, span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, value, span));
    }
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let pattern = lex
            .patterns
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()))
            .cloned();

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token: lex.at().to_string() },
                    lex.span_of(lex.at().len_utf8()),
                ))
            }
        }
    }

    let eof_span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), eof_span));
    trace!("Tokenized {} into {} tokens", lex.file, lex.tokens.len());

    Ok(lex.tokens)
}
