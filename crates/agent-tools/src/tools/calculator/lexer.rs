//! Tokenizer for arithmetic expressions.

use std::iter::Peekable;
use std::str::Chars;

use super::CalcError;

/// Lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    /// `**` or `^`.
    Power,
    LParen,
    RParen,
    Comma,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Ident(name) => format!("name '{}'", name),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::DoubleSlash => "'//'".to_string(),
            Token::Percent => "'%'".to_string(),
            Token::Power => "'**'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
        }
    }
}

/// Split `input` into tokens. Any character outside the grammar is an error.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch.is_ascii_digit() || ch == '.' {
            tokens.push(Token::Number(read_number(&mut chars)?));
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Ident(name));
            continue;
        }

        chars.next();
        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.next_if_eq(&'*').is_some() => Token::Power,
            '*' => Token::Star,
            '/' if chars.next_if_eq(&'/').is_some() => Token::DoubleSlash,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Power,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            other => {
                return Err(CalcError::Syntax(format!("unexpected character '{}'", other)))
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Result<f64, CalcError> {
    let mut text = String::new();
    let mut seen_dot = false;

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            text.push(c);
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            text.push(c);
        } else {
            break;
        }
        chars.next();
    }

    // Exponent only when digits follow; `2e` leaves `e` for the parser to reject.
    if matches!(chars.peek(), Some('e') | Some('E')) {
        let mut lookahead = chars.clone();
        lookahead.next();
        let sign = lookahead.next_if(|c| *c == '+' || *c == '-');
        if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push('e');
            chars.next();
            if let Some(sign) = sign {
                text.push(sign);
                chars.next();
            }
            while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
                text.push(c);
            }
        }
    }

    if text == "." {
        return Err(CalcError::Syntax("unexpected character '.'".to_string()));
    }

    text.parse::<f64>()
        .map_err(|_| CalcError::Syntax(format!("invalid number '{}'", text)))
}
