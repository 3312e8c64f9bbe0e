use crate::{Error, Result};
use regex::{Regex, RegexBuilder};

/// An attribute predicate, `[name]` or `[name op value]`.
#[derive(Clone, PartialEq, Debug)]
pub struct Attribute {
    /// The dotted property path, split at `.`.
    pub path: Vec<String>,
    /// The comparison, or `None` for a presence test.
    pub test: Option<(Operator, Value)>,
}

impl Attribute {
    /// A presence test for the given dotted path.
    #[must_use]
    pub fn present(path: &str) -> Self {
        Self {
            path: split_path(path),
            test: None,
        }
    }

    /// A comparison of the given dotted path against `value`.
    #[must_use]
    pub fn compare(path: &str, operator: Operator, value: Value) -> Self {
        Self {
            path: split_path(path),
            test: Some((operator, value)),
        }
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_string).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,    // =
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=
}

impl Operator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl std::str::FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::NotEq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            _ => Err(Error::UnknownConstruct {
                construct: "operator",
                name: s.to_string(),
            }),
        }
    }
}

/// The right-hand side of an attribute comparison.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Literal(Literal),
    Regex(RegexValue),
    /// `type(name)`, compared against the JavaScript `typeof` of the property.
    Type(String),
}

#[derive(Clone, PartialEq, Debug)]
pub enum Literal {
    String(String),
    Number(f64),
}

/// A `/pattern/flags` value.
#[derive(Clone, Debug)]
pub struct RegexValue {
    pattern: String,
    flags: String,
    regex: Regex,
}

impl RegexValue {
    /// Compiles `pattern` with the JavaScript-style `flags` (any of `imsu`).
    ///
    /// # Errors
    ///
    /// If the pattern does not compile, or a flag is not one of `imsu`, an
    /// [`Error::Regex`] is returned with `pos` set to 0.
    pub fn new(pattern: &str, flags: &str) -> Result<Self> {
        let invalid = |message: String| Error::Regex {
            pos: 0,
            pattern: pattern.to_string(),
            message,
        };

        let mut builder = RegexBuilder::new(pattern);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'u' => builder.unicode(true),
                _ => return Err(invalid(format!("unsupported flag '{flag}'"))),
            };
        }

        let regex = builder.build().map_err(|err| invalid(err.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.flags == other.flags
    }
}

/// The fixed semantic categories of `:statement`, `:expression`, and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassName {
    Statement,
    Expression,
    Declaration,
    Function,
    Pattern,
}

impl ClassName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ClassName::Statement => "statement",
            ClassName::Expression => "expression",
            ClassName::Declaration => "declaration",
            ClassName::Function => "function",
            ClassName::Pattern => "pattern",
        }
    }
}

impl std::str::FromStr for ClassName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "statement" => Ok(ClassName::Statement),
            "expression" => Ok(ClassName::Expression),
            "declaration" => Ok(ClassName::Declaration),
            "function" => Ok(ClassName::Function),
            "pattern" => Ok(ClassName::Pattern),
            _ => Err(Error::UnknownConstruct {
                construct: "class name",
                name: s.to_string(),
            }),
        }
    }
}
