//! Canonical selector text. Printing a parsed selector and parsing the result
//! again yields an equal selector.

use super::{Attribute, CombinatorKind, Literal, Selector, Value};
use std::fmt::{self, Display, Formatter, Write};

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Wildcard => f.write_char('*'),
            Selector::Identifier(name) => {
                // A leading `*` would read back as a wildcard.
                if name.starts_with('*') {
                    f.write_char('#')?;
                }
                f.write_str(name)
            }
            Selector::Field(path) => write!(f, ".{}", path.join(".")),
            Selector::Attribute(attribute) => attribute.fmt(f),
            Selector::Not(selectors) => write_list(f, ":not", selectors),
            Selector::Matches(selectors) => write_list(f, ":matches", selectors),
            Selector::Has(selectors) => write_list(f, ":has", selectors),
            Selector::Compound(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    // `#` keeps a type name from running into a preceding field.
                    if i > 0
                        && matches!(part, Selector::Identifier(name) if !name.starts_with('*'))
                    {
                        f.write_char('#')?;
                    }
                    write_atom(f, part)?;
                }
                Ok(())
            }
            Selector::Subject(inner) => {
                f.write_char('!')?;
                write_atom(f, inner)
            }
            Selector::Combinator { kind, left, right } => {
                left.fmt(f)?;
                f.write_str(match kind {
                    CombinatorKind::Child => " > ",
                    CombinatorKind::Descendant => " ",
                    CombinatorKind::Sibling => " ~ ",
                    CombinatorKind::Adjacent => " + ",
                })?;
                // Combinators associate to the left, so a nested right operand
                // needs explicit grouping.
                write_atom(f, right)
            }
            Selector::NthChild(n) => write!(f, ":nth-child({n})"),
            Selector::NthLastChild(n) => write!(f, ":nth-last-child({n})"),
            Selector::Class(class) => write!(f, ":{}", class.as_str()),
        }
    }
}

/// Writes `selector` so that it reads back as a single sequence.
fn write_atom(f: &mut Formatter<'_>, selector: &Selector) -> fmt::Result {
    match selector {
        Selector::Combinator { .. } => write_list(f, ":matches", std::slice::from_ref(selector)),
        Selector::Compound(parts) if parts.len() == 1 => write_atom(f, &parts[0]),
        _ => selector.fmt(f),
    }
}

fn write_list(f: &mut Formatter<'_>, name: &str, selectors: &[Selector]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, selector) in selectors.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        selector.fmt(f)?;
    }
    f.write_char(')')
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.path.join("."))?;
        if let Some((operator, value)) = &self.test {
            write!(f, "{}{value}", operator.as_str())?;
        }
        f.write_char(']')
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(literal) => literal.fmt(f),
            Value::Regex(regex) => write!(f, "/{}/{}", regex.pattern(), regex.flags()),
            Value::Type(name) => write!(f, "type({name})"),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                f.write_char('"')?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\u{8}' => f.write_str("\\b")?,
                        '\u{c}' => f.write_str("\\f")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        '\u{b}' => f.write_str("\\v")?,
                        c => f.write_char(c)?,
                    }
                }
                f.write_char('"')
            }
            Literal::Number(n) => write!(f, "{n}"),
        }
    }
}
