//! Parsing of the textual type-reference form.
//!
//! The grammar collaborator already hands the engine structured references;
//! this parser exists so declaration files and tests can spell types as
//! strings:
//!
//! ```text
//! reference := segment ('.' segment)* ('[' ']')*
//! segment   := ident ('<' argument (',' argument)* '>')?
//! argument  := '?' (('extends' | 'super') reference)? | reference
//! ```

use std::str::FromStr;

use super::{TypeArgument, TypeReference, TypeSegment, Wildcard};

/// A malformed type reference string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid type reference `{input}` at offset {offset}: {message}")]
pub struct ParseTypeError {
    pub input: String,
    pub offset: usize,
    pub message: &'static str,
}

impl FromStr for TypeReference {
    type Err = ParseTypeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        };
        let reference = parser.reference()?;
        parser.skip_ws();
        if parser.pos != parser.bytes.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(reference)
    }
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &'static str) -> ParseTypeError {
        ParseTypeError {
            input: self.input.to_string(),
            offset: self.pos,
            message,
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&str, ParseTypeError> {
        self.skip_ws();
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            let ok = if self.pos == start {
                b.is_ascii_alphabetic() || b == b'_' || b == b'$'
            } else {
                b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
            };
            if !ok {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected identifier"));
        }
        Ok(&self.input[start..self.pos])
    }

    /// Consume `keyword` if it is the next whole word.
    fn keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let end = self.pos + keyword.len();
        if self.input.get(self.pos..end) != Some(keyword) {
            return false;
        }
        let boundary = self
            .bytes
            .get(end)
            .map_or(true, |b| !(b.is_ascii_alphanumeric() || *b == b'_'));
        if boundary {
            self.pos = end;
        }
        boundary
    }

    fn reference(&mut self) -> Result<TypeReference, ParseTypeError> {
        let mut segments = vec![self.segment()?];
        while self.eat(b'.') {
            segments.push(self.segment()?);
        }
        let mut dimensions = 0;
        while self.eat(b'[') {
            if !self.eat(b']') {
                return Err(self.error("expected `]`"));
            }
            dimensions += 1;
        }
        TypeReference::from_segments(segments, dimensions).ok_or_else(|| self.error("empty type"))
    }

    fn segment(&mut self) -> Result<TypeSegment, ParseTypeError> {
        let name = self.ident()?.to_string();
        let mut args = Vec::new();
        if self.eat(b'<') {
            loop {
                args.push(self.argument()?);
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }
        Ok(TypeSegment::with_args(name, args))
    }

    fn argument(&mut self) -> Result<TypeArgument, ParseTypeError> {
        if !self.eat(b'?') {
            return Ok(TypeArgument::Concrete(self.reference()?));
        }
        let wildcard = if self.keyword("extends") {
            Wildcard::upper(self.reference()?)
        } else if self.keyword("super") {
            Wildcard::lower(self.reference()?)
        } else {
            Wildcard::unbounded()
        };
        Ok(TypeArgument::Wildcard(wildcard))
    }
}
