use super::{
    Error, Result,
    ast::{Attribute, ClassName, CombinatorKind, Literal, Operator, RegexValue, Selector, Value},
    lexer::Lexer,
};

/// Parses selector text into a [`Selector`].
///
/// Comma-separated alternatives become a [`Selector::Matches`]; a single
/// alternative is returned as is.
///
/// # Errors
///
/// If the text is not a valid selector, an [`Error::Parse`] naming the
/// farthest position reached and the terminals expected there is returned.
/// A malformed `/regex/` value is reported as [`Error::Regex`].
pub fn parse(selector: &str) -> Result<Selector> {
    Parser::new(selector).parse()
}

/// Characters that may appear in type names, field names, and bare values.
const IDENTIFIER_CLASS: &str = "[^ [\\],():#!=><~+.]";

fn is_identifier_char(c: char) -> bool {
    !matches!(
        c,
        ' ' | '[' | ']' | ',' | '(' | ')' | ':' | '#' | '!' | '=' | '>' | '<' | '~' | '+' | '.'
    )
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

const CLASS_NAMES: [(&str, ClassName); 5] = [
    ("statement", ClassName::Statement),
    ("expression", ClassName::Expression),
    ("declaration", ClassName::Declaration),
    ("function", ClassName::Function),
    ("pattern", ClassName::Pattern),
];

/// Recursive descent over the selector grammar.
///
/// Every `parse_*` method either consumes its production and returns it, or
/// restores the lexer position and returns `None`, so alternatives can be
/// tried in order. `Err` is reserved for failures that no alternative can
/// recover from.
struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    fn new(selector: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(selector),
        }
    }

    fn parse(mut self) -> Result<Selector> {
        self.lexer.skip_spaces();
        // Blank text is rejected rather than read as a query matching nothing.
        let Some(mut selectors) = self.parse_selectors()? else {
            return Err(self.lexer.error());
        };
        self.lexer.skip_spaces();
        if !self.lexer.expect_end() {
            return Err(self.lexer.error());
        }

        Ok(if selectors.len() == 1 {
            selectors.remove(0)
        } else {
            Selector::Matches(selectors)
        })
    }

    /// `selector (_ "," _ selector)*`
    fn parse_selectors(&mut self) -> Result<Option<Vec<Selector>>> {
        let Some(first) = self.parse_selector()? else {
            return Ok(None);
        };

        let mut selectors = vec![first];
        loop {
            let start = self.lexer.tell();
            self.lexer.skip_spaces();
            if self.lexer.consume(",") {
                self.lexer.skip_spaces();
                if let Some(selector) = self.parse_selector()? {
                    selectors.push(selector);
                    continue;
                }
            }
            self.lexer.seek(start);
            break;
        }

        Ok(Some(selectors))
    }

    /// `sequence (binaryOp sequence)*`, folded to the left.
    fn parse_selector(&mut self) -> Result<Option<Selector>> {
        let Some(mut selector) = self.parse_sequence()? else {
            return Ok(None);
        };

        loop {
            let start = self.lexer.tell();
            if let Some(kind) = self.parse_binary_op()
                && let Some(right) = self.parse_sequence()?
            {
                selector = Selector::combinator(kind, selector, right);
                continue;
            }
            self.lexer.seek(start);
            break;
        }

        Ok(Some(selector))
    }

    fn parse_binary_op(&mut self) -> Option<CombinatorKind> {
        let start = self.lexer.tell();
        for (op, kind) in [
            (">", CombinatorKind::Child),
            ("~", CombinatorKind::Sibling),
            ("+", CombinatorKind::Adjacent),
        ] {
            self.lexer.skip_spaces();
            if self.lexer.consume(op) {
                self.lexer.skip_spaces();
                return Some(kind);
            }
            self.lexer.seek(start);
        }

        if self.lexer.consume(" ") {
            self.lexer.skip_spaces();
            return Some(CombinatorKind::Descendant);
        }

        None
    }

    /// `"!"? atom+`
    fn parse_sequence(&mut self) -> Result<Option<Selector>> {
        let start = self.lexer.tell();
        let subject = self.lexer.consume("!");

        let mut atoms = Vec::new();
        while let Some(atom) = self.parse_atom()? {
            atoms.push(atom);
        }

        if atoms.is_empty() {
            self.lexer.seek(start);
            return Ok(None);
        }

        let sequence = if atoms.len() == 1 {
            atoms.remove(0)
        } else {
            Selector::Compound(atoms)
        };

        Ok(Some(if subject {
            Selector::Subject(Box::new(sequence))
        } else {
            sequence
        }))
    }

    fn parse_atom(&mut self) -> Result<Option<Selector>> {
        if self.lexer.consume("*") {
            return Ok(Some(Selector::Wildcard));
        }
        if let Some(name) = self.parse_identifier() {
            return Ok(Some(Selector::Identifier(name.to_string())));
        }
        if let Some(attribute) = self.parse_attribute()? {
            return Ok(Some(Selector::Attribute(attribute)));
        }
        if let Some(path) = self.parse_field() {
            return Ok(Some(Selector::Field(path)));
        }
        if let Some(selectors) = self.parse_pseudo_list(":not(")? {
            return Ok(Some(Selector::Not(selectors)));
        }
        if let Some(selectors) = self.parse_pseudo_list(":matches(")? {
            return Ok(Some(Selector::Matches(selectors)));
        }
        if let Some(selectors) = self.parse_pseudo_list(":has(")? {
            return Ok(Some(Selector::Has(selectors)));
        }
        if self.lexer.consume(":first-child") {
            return Ok(Some(Selector::NthChild(1)));
        }
        if self.lexer.consume(":last-child") {
            return Ok(Some(Selector::NthLastChild(1)));
        }
        if let Some(n) = self.parse_nth(":nth-child(") {
            return Ok(Some(Selector::NthChild(n)));
        }
        if let Some(n) = self.parse_nth(":nth-last-child(") {
            return Ok(Some(Selector::NthLastChild(n)));
        }
        Ok(self.parse_class().map(Selector::Class))
    }

    /// `"#"? identifierName`
    fn parse_identifier(&mut self) -> Option<&'a str> {
        let start = self.lexer.tell();
        self.lexer.consume("#");
        let name = self.lexer.take_while1(IDENTIFIER_CLASS, is_identifier_char);
        if name.is_none() {
            self.lexer.seek(start);
        }
        name
    }

    /// `identifierName ("." identifierName)*`
    fn parse_dotted_name(&mut self) -> Option<Vec<String>> {
        let first = self
            .lexer
            .take_while1(IDENTIFIER_CLASS, is_identifier_char)?;

        let mut path = vec![first.to_string()];
        loop {
            let start = self.lexer.tell();
            if self.lexer.consume(".")
                && let Some(name) = self.lexer.take_while1(IDENTIFIER_CLASS, is_identifier_char)
            {
                path.push(name.to_string());
                continue;
            }
            self.lexer.seek(start);
            break;
        }

        Some(path)
    }

    /// `"." identifierName ("." identifierName)*`
    fn parse_field(&mut self) -> Option<Vec<String>> {
        let start = self.lexer.tell();
        if !self.lexer.consume(".") {
            return None;
        }
        let path = self.parse_dotted_name();
        if path.is_none() {
            self.lexer.seek(start);
        }
        path
    }

    /// `"[" _ attrValue _ "]"`
    fn parse_attribute(&mut self) -> Result<Option<Attribute>> {
        let start = self.lexer.tell();
        if !self.lexer.consume("[") {
            return Ok(None);
        }
        self.lexer.skip_spaces();

        if let Some(attribute) = self.parse_attribute_body()? {
            self.lexer.skip_spaces();
            if self.lexer.consume("]") {
                return Ok(Some(attribute));
            }
        }

        self.lexer.seek(start);
        Ok(None)
    }

    fn parse_attribute_body(&mut self) -> Result<Option<Attribute>> {
        let start = self.lexer.tell();

        // name _ ("!"? "=") _ (type / regex)
        if let Some(path) = self.parse_dotted_name() {
            self.lexer.skip_spaces();
            if let Some(operator) = self.parse_equality_operator() {
                self.lexer.skip_spaces();
                if let Some(value) = self.parse_type_or_regex()? {
                    return Ok(Some(Attribute {
                        path,
                        test: Some((operator, value)),
                    }));
                }
            }
        }
        self.lexer.seek(start);

        // name _ ([><!]? "=" / [><]) _ (string / number / path)
        if let Some(path) = self.parse_dotted_name() {
            self.lexer.skip_spaces();
            if let Some(operator) = self.parse_operator() {
                self.lexer.skip_spaces();
                if let Some(literal) = self.parse_literal() {
                    return Ok(Some(Attribute {
                        path,
                        test: Some((operator, Value::Literal(literal))),
                    }));
                }
            }
        }
        self.lexer.seek(start);

        // name
        Ok(self
            .parse_dotted_name()
            .map(|path| Attribute { path, test: None }))
    }

    fn parse_equality_operator(&mut self) -> Option<Operator> {
        let start = self.lexer.tell();
        let negated = self.lexer.consume("!");
        if self.lexer.consume("=") {
            Some(if negated { Operator::NotEq } else { Operator::Eq })
        } else {
            self.lexer.seek(start);
            None
        }
    }

    fn parse_operator(&mut self) -> Option<Operator> {
        let start = self.lexer.tell();
        let prefix = self.lexer.consume_if("[><!]", |c| matches!(c, '>' | '<' | '!'));
        if self.lexer.consume("=") {
            return Some(match prefix {
                Some('>') => Operator::Ge,
                Some('<') => Operator::Le,
                Some('!') => Operator::NotEq,
                _ => Operator::Eq,
            });
        }
        self.lexer.seek(start);

        match self.lexer.consume_if("[><]", |c| matches!(c, '>' | '<')) {
            Some('>') => Some(Operator::Gt),
            Some(_) => Some(Operator::Lt),
            None => None,
        }
    }

    fn parse_type_or_regex(&mut self) -> Result<Option<Value>> {
        if let Some(name) = self.parse_type() {
            return Ok(Some(Value::Type(name.to_string())));
        }
        Ok(self.parse_regex()?.map(Value::Regex))
    }

    /// `"type(" _ [^ )]+ _ ")"`
    fn parse_type(&mut self) -> Option<&'a str> {
        let start = self.lexer.tell();
        if self.lexer.consume("type(") {
            self.lexer.skip_spaces();
            if let Some(name) = self.lexer.take_while1("[^ )]", |c| c != ' ' && c != ')') {
                self.lexer.skip_spaces();
                if self.lexer.consume(")") {
                    return Some(name);
                }
            }
        }
        self.lexer.seek(start);
        None
    }

    /// `"/" [^/]+ "/" [imsu]*`
    fn parse_regex(&mut self) -> Result<Option<RegexValue>> {
        let start = self.lexer.tell();
        if self.lexer.consume("/")
            && let Some(pattern) = self.lexer.take_while1("[^/]", |c| c != '/')
            && self.lexer.consume("/")
        {
            let flags = self
                .lexer
                .take_while("[imsu]", |c| matches!(c, 'i' | 'm' | 's' | 'u'));
            return RegexValue::new(pattern, flags)
                .map(Some)
                .map_err(|err| match err {
                    Error::Regex {
                        pattern, message, ..
                    } => Error::Regex {
                        pos: start,
                        pattern,
                        message,
                    },
                    other => other,
                });
        }
        self.lexer.seek(start);
        Ok(None)
    }

    fn parse_literal(&mut self) -> Option<Literal> {
        self.parse_string('"')
            .or_else(|| self.parse_string('\''))
            .or_else(|| self.parse_number())
            .or_else(|| {
                self.lexer
                    .take_while1(IDENTIFIER_CLASS, is_identifier_char)
                    .map(|path| Literal::String(path.to_string()))
            })
    }

    fn parse_string(&mut self, quote: char) -> Option<Literal> {
        let (delimiter, class) = if quote == '"' {
            ("\"", "[^\\\\\"]")
        } else {
            ("'", "[^\\\\']")
        };

        let start = self.lexer.tell();
        if !self.lexer.consume(delimiter) {
            return None;
        }

        let mut value = String::new();
        loop {
            if self.lexer.consume("\\") {
                let Some(escaped) = self.lexer.consume_if("any character", |_| true) else {
                    self.lexer.seek(start);
                    return None;
                };
                unescape_into(&mut value, escaped);
            } else if let Some(c) = self.lexer.consume_if(class, |c| c != '\\' && c != quote) {
                value.push(c);
            } else {
                break;
            }
        }

        if self.lexer.consume(delimiter) {
            Some(Literal::String(value))
        } else {
            self.lexer.seek(start);
            None
        }
    }

    /// `([0-9]* ".")? [0-9]+`
    fn parse_number(&mut self) -> Option<Literal> {
        let start = self.lexer.tell();

        self.lexer.take_while("[0-9]", is_digit);
        if !self.lexer.consume(".") {
            self.lexer.seek(start);
        }

        if self.lexer.take_while1("[0-9]", is_digit).is_some() {
            if let Ok(number) = self.lexer.slice_from(start).parse() {
                return Some(Literal::Number(number));
            }
        }

        self.lexer.seek(start);
        None
    }

    /// `":not(" _ selectors _ ")"` and friends.
    fn parse_pseudo_list(&mut self, open: &'static str) -> Result<Option<Vec<Selector>>> {
        let start = self.lexer.tell();
        if !self.lexer.consume(open) {
            return Ok(None);
        }
        self.lexer.skip_spaces();

        if let Some(selectors) = self.parse_selectors()? {
            self.lexer.skip_spaces();
            if self.lexer.consume(")") {
                return Ok(Some(selectors));
            }
        }

        self.lexer.seek(start);
        Ok(None)
    }

    /// `":nth-child(" _ [0-9]+ _ ")"` and `:nth-last-child(...)`.
    fn parse_nth(&mut self, open: &'static str) -> Option<usize> {
        let start = self.lexer.tell();
        if self.lexer.consume(open) {
            self.lexer.skip_spaces();
            if let Some(digits) = self.lexer.take_while1("[0-9]", is_digit) {
                self.lexer.skip_spaces();
                if self.lexer.consume(")") {
                    // An index too large to be a position can never match.
                    return Some(digits.parse().unwrap_or(usize::MAX));
                }
            }
        }
        self.lexer.seek(start);
        None
    }

    /// `":" ("statement"i / "expression"i / ...)`
    fn parse_class(&mut self) -> Option<ClassName> {
        let start = self.lexer.tell();
        if self.lexer.consume(":") {
            for (keyword, class) in CLASS_NAMES {
                if self.lexer.consume_keyword(keyword) {
                    return Some(class);
                }
            }
        }
        self.lexer.seek(start);
        None
    }
}

/// Decodes the character after a backslash in a quoted string.
fn unescape_into(value: &mut String, escaped: char) {
    match escaped {
        'b' => value.push('\u{8}'),
        'f' => value.push('\u{c}'),
        'n' => value.push('\n'),
        'r' => value.push('\r'),
        't' => value.push('\t'),
        'v' => value.push('\u{b}'),
        // Line terminators are not escapable and keep their backslash.
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
            value.push('\\');
            value.push(escaped);
        }
        c => value.push(c),
    }
}
