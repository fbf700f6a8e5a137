use logos::Logos;
use std::ops::Range;

fn parse_number(slice: &str) -> Option<f64> {
    if let Some(hex) = slice
        .strip_prefix("0x")
        .or_else(|| slice.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok().map(|v| v as f64)
    } else {
        slice.parse().ok()
    }
}

/// `--` opens either a `--[[ ]]` block comment or a line comment. Both
/// share the prefix, so the split happens here instead of in competing
/// regexes: a longest-match line pattern would swallow code trailing a
/// one-line block comment.
fn skip_comment<'src>(lex: &mut logos::Lexer<'src, Token<'src>>) -> logos::Skip {
    let rest = lex.remainder();
    if let Some(body) = rest.strip_prefix("[[") {
        match body.find("]]") {
            Some(end) => lex.bump(2 + end + 2),
            // unterminated block comment, consume to end of input
            None => lex.bump(rest.len()),
        }
    } else {
        match rest.find('\n') {
            Some(end) => lex.bump(end),
            None => lex.bump(rest.len()),
        }
    }
    logos::Skip
}

/// Tokens for the Lua source language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token<'src> {
    // Keywords
    #[token("local")]
    Local,
    #[token("function")]
    Function,
    #[token("end")]
    End,
    #[token("return")]
    Return,
    #[token("do")]
    Do,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("elseif")]
    Elseif,
    #[token("while")]
    While,
    #[token("repeat")]
    Repeat,
    #[token("until")]
    Until,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("break")]
    Break,
    #[token("nil")]
    Nil,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    // Literals
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident(&'src str),

    #[regex(r"0[xX][0-9a-fA-F]+", |lex| parse_number(lex.slice()))]
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| parse_number(lex.slice()))]
    Number(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    String(&'src str),

    // Punctuation and operators
    #[token("...")]
    Ellipsis,
    #[token("..")]
    Concat,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("==")]
    EqEq,
    #[token("~=")]
    NotEq,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("#")]
    Hash,

    /// Never produced; the callback skips the whole comment
    #[regex(r"--", skip_comment)]
    Comment,

    /// Anything the lexer could not recognize
    #[regex(r".", priority = 0)]
    Error,
}

/// Tokenize Lua source into (token, byte range) pairs.
/// Unrecognized input becomes `Token::Error`; the parser reports it
/// as a lexer error with the offending position.
pub fn tokenize(source: &str) -> Vec<(Token<'_>, Range<usize>)> {
    Token::lexer(source)
        .spanned()
        .map(|(token, span)| (token.unwrap_or(Token::Error), span))
        .collect()
}
