// ABOUTME: Lexer — turns Monkey source text into a stream of tokens.
// ABOUTME: Implemented as an Iterator over a peekable char stream.

use std::iter::Peekable;
use std::str::Chars;

use crate::engine::token::Token;

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn next_symbol(&mut self, ch: char) -> Token {
        match ch {
            '=' if self.chars.next_if_eq(&'=').is_some() => Token::Equal,
            '=' => Token::Assign,
            '!' if self.chars.next_if_eq(&'=').is_some() => Token::NotEqual,
            '!' => Token::Bang,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Asterisk,
            '/' => Token::Slash,
            '<' => Token::LessThan,
            '>' => Token::GreaterThan,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            other => Token::Illegal(other.to_string()),
        }
    }

    fn next_word(&mut self, first: char) -> Token {
        let mut word = String::from(first);
        while let Some(c) = self.chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
            word.push(c);
        }
        Token::from_word(word)
    }

    fn next_int(&mut self, first: char) -> Token {
        let mut literal = String::from(first);
        while let Some(c) = self.chars.next_if(|c| c.is_alphanumeric()) {
            literal.push(c);
        }
        match literal.parse() {
            Ok(val) => Token::Int(val),
            Err(_) => Token::Illegal(literal),
        }
    }

    /// Scan a string literal; the opening quote has already been consumed.
    fn next_str(&mut self) -> Token {
        let mut literal = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Token::Str(literal),
                Some('\\') => match self.chars.next() {
                    Some('n') => literal.push('\n'),
                    Some('t') => literal.push('\t'),
                    Some(other) => literal.push(other),
                    None => break,
                },
                Some(c) => literal.push(c),
                None => break,
            }
        }
        Token::Illegal(format!("\"{}", literal))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let ch = self.chars.next()?;
        let token = match ch {
            '"' => self.next_str(),
            c if c.is_alphabetic() || c == '_' => self.next_word(c),
            c if c.is_ascii_digit() => self.next_int(c),
            c => self.next_symbol(c),
        };
        Some(token)
    }
}
