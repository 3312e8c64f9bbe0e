use super::Error;

pub mod expected;

pub use expected::Expected;

/// Character cursor over selector text.
///
/// The parser backtracks by saving [`tell`](Lexer::tell) and restoring it with
/// [`seek`](Lexer::seek). Every failed attempt to read a terminal is recorded,
/// and the error reported for a failed parse is the set of terminals expected
/// at the farthest position any attempt reached.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    fail_pos: usize,
    expected: Vec<Expected>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            fail_pos: 0,
            expected: Vec::new(),
        }
    }

    /// The current byte offset.
    #[must_use]
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Moves back to a byte offset previously returned by [`tell`](Lexer::tell).
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// The text consumed since byte offset `start`.
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    /// Consumes `literal` if the input continues with it.
    pub fn consume(&mut self, literal: &'static str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            self.fail(Expected::Literal(literal));
            false
        }
    }

    /// Consumes `keyword` if the input continues with it, ignoring ASCII case.
    pub fn consume_keyword(&mut self, keyword: &'static str) -> bool {
        match self.rest().get(..keyword.len()) {
            Some(head) if head.eq_ignore_ascii_case(keyword) => {
                self.pos += keyword.len();
                true
            }
            _ => {
                self.fail(Expected::Keyword(keyword));
                false
            }
        }
    }

    /// Consumes one character of the given class.
    pub fn consume_if(&mut self, class: &'static str, pred: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(c) if pred(c) => self.advance(),
            _ => {
                self.fail(Expected::Class(class));
                None
            }
        }
    }

    /// Consumes a possibly empty run of characters of the given class.
    pub fn take_while(&mut self, class: &'static str, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.consume_if(class, &pred).is_some() {}
        &self.input[start..self.pos]
    }

    /// Consumes a non-empty run of characters of the given class.
    pub fn take_while1(
        &mut self,
        class: &'static str,
        pred: impl Fn(char) -> bool,
    ) -> Option<&'a str> {
        let run = self.take_while(class, pred);
        (!run.is_empty()).then_some(run)
    }

    /// Skips insignificant spaces.
    pub fn skip_spaces(&mut self) {
        self.take_while("\" \"", |c| c == ' ');
    }

    /// Succeeds only at the end of the input.
    pub fn expect_end(&mut self) -> bool {
        if self.is_at_end() {
            true
        } else {
            self.fail(Expected::End);
            false
        }
    }

    fn fail(&mut self, expected: Expected) {
        if self.pos < self.fail_pos {
            return;
        }
        if self.pos > self.fail_pos {
            self.fail_pos = self.pos;
            self.expected.clear();
        }
        self.expected.push(expected);
    }

    /// Builds the error for the farthest failure seen so far.
    #[must_use]
    pub fn error(&self) -> Error {
        let before = &self.input[..self.fail_pos];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before, |newline| &before[newline + 1..])
            .chars()
            .count()
            + 1;

        let mut expected = self.expected.clone();
        expected.sort();
        expected.dedup();

        Error::Parse {
            pos: self.fail_pos,
            line,
            column,
            expected: expected.iter().map(ToString::to_string).collect(),
            found: self.input[self.fail_pos..].chars().next(),
        }
    }
}
