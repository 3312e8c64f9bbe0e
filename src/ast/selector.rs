use super::{Attribute, ClassName};

/// A compiled selector.
///
/// Selectors are plain values: the matcher only ever reads them, so one
/// parsed selector can be shared between any number of queries and threads.
#[derive(Clone, PartialEq, Debug)]
pub enum Selector {
    Wildcard,            // *
    Identifier(String),  // node type, compared case-insensitively
    Field(Vec<String>),  // .callee.object
    Attribute(Attribute), // [name op value]

    Not(Vec<Selector>),     // :not(a, b)
    Matches(Vec<Selector>), // :matches(a, b), and top-level `a, b`
    Has(Vec<Selector>),     // :has(a, b)

    /// Juxtaposed atoms, all of which must match (`Identifier[name="x"]`).
    Compound(Vec<Selector>),

    /// A sequence prefixed with `!`. The query reports the node matched by
    /// this part instead of the rightmost one.
    Subject(Box<Selector>),

    Combinator {
        kind: CombinatorKind,
        left: Box<Selector>,
        right: Box<Selector>,
    },

    // Positional pseudo-classes, 1-based from the respective end.
    NthChild(usize),     // :nth-child(n), :first-child
    NthLastChild(usize), // :nth-last-child(n), :last-child

    Class(ClassName), // :statement, :expression, ...
}

/// The structural relation of a [`Selector::Combinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    Child,      // a > b
    Descendant, // a b
    Sibling,    // a ~ b
    Adjacent,   // a + b
}

impl Selector {
    /// Builds a combinator node.
    #[must_use]
    pub fn combinator(kind: CombinatorKind, left: Selector, right: Selector) -> Self {
        Selector::Combinator {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns `true` if this selector was marked with `!`.
    #[must_use]
    pub const fn is_subject(&self) -> bool {
        matches!(self, Selector::Subject(_))
    }
}

impl std::str::FromStr for Selector {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}
