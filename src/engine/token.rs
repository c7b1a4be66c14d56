// ABOUTME: Lexical tokens of the Monkey language.
// ABOUTME: Keywords are resolved from identifiers at lex time.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Illegal(String),
    Ident(String),
    Int(i64),
    Str(String),
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl Token {
    /// Map a scanned word to its keyword token, or an identifier.
    pub fn from_word(word: String) -> Self {
        match word.as_str() {
            "fn" => Token::Function,
            "let" => Token::Let,
            "true" => Token::True,
            "false" => Token::False,
            "if" => Token::If,
            "else" => Token::Else,
            "return" => Token::Return,
            _ => Token::Ident(word),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Illegal(s) => write!(f, "illegal token '{}'", s),
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Int(val) => write!(f, "{}", val),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Assign => write!(f, "'='"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Bang => write!(f, "'!'"),
            Token::Asterisk => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::LessThan => write!(f, "'<'"),
            Token::GreaterThan => write!(f, "'>'"),
            Token::Equal => write!(f, "'=='"),
            Token::NotEqual => write!(f, "'!='"),
            Token::Comma => write!(f, "','"),
            Token::Semicolon => write!(f, "';'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Function => write!(f, "'fn'"),
            Token::Let => write!(f, "'let'"),
            Token::True => write!(f, "'true'"),
            Token::False => write!(f, "'false'"),
            Token::If => write!(f, "'if'"),
            Token::Else => write!(f, "'else'"),
            Token::Return => write!(f, "'return'"),
        }
    }
}
