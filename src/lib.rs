//! CSS-like selector queries over ESTree-shaped syntax trees.

#![warn(clippy::pedantic, rust_2018_idioms)]
#![allow(clippy::missing_errors_doc, clippy::too_many_lines)]

pub mod ast;
pub mod cache;
pub mod engine;
pub mod keys;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod query;
pub mod traverse;
pub mod tree;

pub use self::{
    ast::{Attribute, ClassName, CombinatorKind, Literal, Operator, RegexValue, Selector, Value},
    cache::SelectorCache,
    engine::matches,
    keys::{Fallback, VisitorKeys},
    options::Options,
    parser::parse,
    query::{for_each_match, match_selector, query, query_cached, query_with, subjects},
    traverse::{VisitAction, Visitor, traverse},
    tree::{AstValue, ValueKind},
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The selector text does not follow the selector grammar.
    #[error(
        "expected {} but {} found at line {line}, column {column}",
        describe_expected(.expected),
        describe_found(.found)
    )]
    Parse {
        pos: usize,
        line: usize,
        column: usize,
        expected: Vec<String>,
        found: Option<char>,
    },

    /// A `/.../` attribute value is not a valid regular expression.
    #[error("invalid regular expression /{pattern}/ at {pos}: {message}")]
    Regex {
        pos: usize,
        pattern: String,
        message: String,
    },

    /// A selector construct the engine does not support.
    #[error("unknown {construct}: {name}")]
    UnknownConstruct {
        construct: &'static str,
        name: String,
    },

    /// The tree could not be walked without silently skipping nodes.
    #[error("cannot traverse node of type '{node_type}': {reason}")]
    Traversal { node_type: String, reason: String },
}

impl Error {
    /// Returns `true` for errors caused by malformed selector text.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. } | Error::Regex { .. })
    }
}

fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => "end of input".to_string(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

fn describe_found(found: &Option<char>) -> String {
    found.map_or_else(|| "end of input".to_string(), |c| format!("{c:?}"))
}

pub type Result<T> = std::result::Result<T, Error>;
