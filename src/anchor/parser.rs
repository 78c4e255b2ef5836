//! Node path parser
//!
//! Parses path strings into structured [`NodePath`] values.
//!
//! Grammar (simplified):
//! ```text
//! path      = step+
//! step      = "/" tag "[" number "]"
//!           | "/" "text()" "[" number "]"   (must be last)
//! tag       = letter (letter | digit | "-" | "_" | ":")*
//! ```

use thiserror::Error;

use super::types::{NodePath, PathStep, TextStep};

/// Path parsing errors
#[derive(Debug, Error)]
pub enum PathParseError {
    #[error("Empty path string")]
    Empty,

    #[error("Expected '/' at position {0}")]
    ExpectedSlash(usize),

    #[error("Expected tag name at position {0}")]
    ExpectedTag(usize),

    #[error("Expected number at position {0}")]
    ExpectedNumber(usize),

    #[error("Sibling index must be at least 1 at position {0}")]
    ZeroIndex(usize),

    #[error("Unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("text() step must be the last step")]
    TextStepNotLast,
}

/// Parser state
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), PathParseError> {
        if self.skip_if(expected) {
            Ok(())
        } else {
            Err(PathParseError::UnexpectedChar(
                self.peek().unwrap_or('\0'),
                self.pos,
            ))
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn skip_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn parse_number(&mut self) -> Result<u32, PathParseError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(PathParseError::ExpectedNumber(start));
        }
        self.input[start..self.pos]
            .parse()
            .map_err(|_| PathParseError::ExpectedNumber(start))
    }

    fn parse_index(&mut self) -> Result<u32, PathParseError> {
        self.expect('[')?;
        let start = self.pos;
        let index = self.parse_number()?;
        self.expect(']')?;
        if index == 0 {
            return Err(PathParseError::ZeroIndex(start));
        }
        Ok(index)
    }

    fn parse_tag(&mut self) -> Result<String, PathParseError> {
        let start = self.pos;
        match self.peek() {
            Some(ch) if ch.is_ascii_alphabetic() => {
                self.advance();
            }
            _ => return Err(PathParseError::ExpectedTag(start)),
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_ascii_lowercase())
    }

    fn parse_path(&mut self) -> Result<NodePath, PathParseError> {
        let mut steps = Vec::new();
        let mut text: Option<TextStep> = None;

        while !self.at_end() {
            if !self.skip_if('/') {
                return Err(PathParseError::ExpectedSlash(self.pos));
            }
            if text.is_some() {
                // Nothing may follow the text() step.
                return Err(PathParseError::TextStepNotLast);
            }
            if self.skip_str("text()") {
                let index = self.parse_index()?;
                text = Some(TextStep { index });
            } else {
                let tag = self.parse_tag()?;
                let index = self.parse_index()?;
                steps.push(PathStep { tag, index });
            }
        }

        Ok(NodePath { steps, text })
    }
}

/// Parse a path string into a [`NodePath`].
pub fn parse(input: &str) -> Result<NodePath, PathParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PathParseError::Empty);
    }

    let mut parser = Parser::new(input);
    let path = parser.parse_path()?;

    if !parser.at_end() {
        return Err(PathParseError::UnexpectedChar(
            parser.peek().unwrap_or('\0'),
            parser.pos,
        ));
    }

    Ok(path)
}
