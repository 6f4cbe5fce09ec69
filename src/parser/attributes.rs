//! Parsing of backend attribute strings into key/value pairs and flags
//!
//! A fragment is the text between top-level commas. `key=value` fragments
//! become pairs, bare fragments become flags. Braces group text, so commas and
//! `=` inside them belong to the value. Malformed fragments are dropped with a
//! warning; the rest of the string is still used.

use std::fmt;

use log::warn;
use thiserror::Error;

use super::lexer::{lex, Span, Token};

/// One parsed attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    /// `None` for boolean flags such as `thick`
    pub value: Option<String>,
}

impl Attribute {
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn flag(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn is_flag(&self) -> bool {
        self.value.is_none()
    }
}

/// Why a fragment was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    EmptyKey,
    EmptyValue,
    BracedKey,
    UnbalancedBraces,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            MalformedReason::EmptyKey => "missing key before '='",
            MalformedReason::EmptyValue => "missing value after '='",
            MalformedReason::BracedKey => "braces in key",
            MalformedReason::UnbalancedBraces => "unbalanced braces",
        };
        f.write_str(reason)
    }
}

/// A dropped attribute fragment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed attribute fragment `{fragment}`: {reason}")]
pub struct MalformedAttribute {
    pub fragment: String,
    pub reason: MalformedReason,
}

/// Parse an attribute string, logging and dropping malformed fragments
pub fn parse_attributes(source: &str) -> Vec<Attribute> {
    let (attributes, malformed) = parse_attributes_checked(source);
    for fragment in &malformed {
        warn!("{fragment}; dropped");
    }
    attributes
}

/// Parse an attribute string, returning malformed fragments alongside
pub fn parse_attributes_checked(source: &str) -> (Vec<Attribute>, Vec<MalformedAttribute>) {
    let mut attributes = Vec::new();
    let mut malformed = Vec::new();

    for fragment in split_fragments(source) {
        let text = source[fragment.start..fragment.end].trim();
        if text.is_empty() {
            continue;
        }
        match fragment.attribute(source) {
            Ok(attribute) => attributes.push(attribute),
            Err(reason) => malformed.push(MalformedAttribute {
                fragment: text.to_string(),
                reason,
            }),
        }
    }

    (attributes, malformed)
}

#[derive(Debug, Default)]
struct Fragment {
    start: usize,
    end: usize,
    /// First top-level `=`
    equals: Option<Span>,
    brace_before_equals: bool,
    unbalanced: bool,
}

impl Fragment {
    fn at(start: usize) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    fn attribute(&self, source: &str) -> Result<Attribute, MalformedReason> {
        if self.unbalanced {
            return Err(MalformedReason::UnbalancedBraces);
        }
        let Some(equals) = &self.equals else {
            return Ok(Attribute::flag(normalize_key(&source[self.start..self.end])));
        };

        let key = normalize_key(&source[self.start..equals.start]);
        let value = source[equals.end..self.end].trim();
        if key.is_empty() {
            return Err(MalformedReason::EmptyKey);
        }
        if self.brace_before_equals {
            return Err(MalformedReason::BracedKey);
        }
        if value.is_empty() {
            return Err(MalformedReason::EmptyValue);
        }
        Ok(Attribute::pair(key, value))
    }
}

/// Collapse whitespace runs so `minimum   width` matches `minimum width`
fn normalize_key(key: &str) -> String {
    key.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_fragments(source: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut current = Fragment::at(0);
    let mut depth = 0usize;

    for (token, span) in lex(source) {
        match token {
            Token::Comma if depth == 0 => {
                current.end = span.start;
                fragments.push(std::mem::replace(&mut current, Fragment::at(span.end)));
            }
            Token::Equals if depth == 0 && current.equals.is_none() => {
                current.equals = Some(span);
            }
            Token::BraceOpen => {
                if current.equals.is_none() {
                    current.brace_before_equals = true;
                }
                depth += 1;
            }
            Token::BraceClose => {
                if depth == 0 {
                    current.unbalanced = true;
                } else {
                    depth -= 1;
                }
            }
            Token::Comma | Token::Equals | Token::Text => {}
        }
    }

    current.end = source.len();
    if depth > 0 {
        current.unbalanced = true;
    }
    fragments.push(current);
    fragments
}
