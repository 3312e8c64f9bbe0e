use std::fmt;

/// A grammar terminal the lexer tried to read at some position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expected {
    /// A literal string, matched exactly.
    Literal(&'static str),
    /// A literal keyword, matched ignoring ASCII case.
    Keyword(&'static str),
    /// A character class, described the way it would be in a grammar file
    /// (e.g. `[0-9]`).
    Class(&'static str),
    /// The end of the selector text.
    End,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Literal(text) => write!(f, "{text:?}"),
            Expected::Keyword(text) => write!(f, "{text:?}i"),
            Expected::Class(class) => f.write_str(class),
            Expected::End => f.write_str("end of input"),
        }
    }
}
