use std::str::FromStr;

use num_traits::Float;
use tracing::trace;

use crate::{
    error::{ErrorKind, EvalError},
    options::Options,
};

/// Floating-point types an expression can be evaluated in.
pub trait Number: Float + FromStr {}

impl<T: Float + FromStr> Number for T {}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn apply<T: Number>(self, lhs: T, rhs: T) -> T {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div => lhs / rhs,
        }
    }
}

/// Parses and evaluates one expression in a single pass.
///
/// The grammar, from loosest to tightest binding:
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := unary (('*' | '/') unary)*
/// unary      := ('+' | '-')* primary
/// primary    := '(' expression ')' | number
/// number     := digits with at most one '.'
/// ```
///
/// Each rule returns the value it matched; there is no syntax tree.
pub struct Evaluator<'a> {
    src: &'a str,
    /// Byte offset of the cursor into `src`.
    offset: usize,
    /// Character offset of the cursor, used for error spans.
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(src: &'a str, options: &Options) -> Self {
        Evaluator {
            src,
            offset: 0,
            pos: 0,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    fn current(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn next(&mut self) {
        if let Some(c) = self.current() {
            self.offset += c.len_utf8();
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current().map_or(false, char::is_whitespace) {
            self.next();
        }
    }

    fn error(&self, kind: ErrorKind, start: usize) -> EvalError {
        EvalError::new(kind, start..self.pos.max(start + 1))
    }

    /// Evaluates the whole input, which must be exactly one expression.
    pub fn evaluate<T: Number>(mut self) -> Result<T, EvalError> {
        #[cfg(feature = "tracy")]
        profiling::scope!("Evaluator::evaluate");
        let value = self.expression()?;
        self.skip_whitespace();
        if self.current().is_some() {
            let end = self.pos + self.src[self.offset..].chars().count();
            return Err(EvalError::new(ErrorKind::TrailingInput, self.pos..end));
        }
        Ok(value)
    }

    fn expression<T: Number>(&mut self) -> Result<T, EvalError> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.current().and_then(Operator::from_char) {
                Some(op @ (Operator::Add | Operator::Sub)) => {
                    self.next();
                    let rhs = self.term()?;
                    value = op.apply(value, rhs);
                }
                _ => return Ok(value),
            }
        }
    }

    fn term<T: Number>(&mut self) -> Result<T, EvalError> {
        let mut value = self.unary()?;
        loop {
            self.skip_whitespace();
            match self.current().and_then(Operator::from_char) {
                Some(op @ (Operator::Mul | Operator::Div)) => {
                    self.next();
                    self.skip_whitespace();
                    let start = self.pos;
                    let rhs: T = self.unary()?;
                    // Anything closer to zero than epsilon counts as zero.
                    if op == Operator::Div && rhs.abs() < T::epsilon() {
                        return Err(self.error(ErrorKind::DivisionByZero, start));
                    }
                    value = op.apply(value, rhs);
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary<T: Number>(&mut self) -> Result<T, EvalError> {
        let mut negate = false;
        loop {
            self.skip_whitespace();
            match self.current() {
                None => return Err(self.error(ErrorKind::UnexpectedEnd, self.pos)),
                Some('+') => {}
                Some('-') => negate = !negate,
                Some(_) => break,
            }
            self.next();
        }
        let value: T = self.primary()?;
        Ok(if negate { -value } else { value })
    }

    fn primary<T: Number>(&mut self) -> Result<T, EvalError> {
        if self.current() != Some('(') {
            return self.number();
        }
        let open = self.pos;
        if self.depth >= self.max_depth {
            return Err(self.error(ErrorKind::TooDeep, open));
        }
        self.depth += 1;
        trace!(depth = self.depth, pos = open, "entering group");
        self.next();

        let value = self.expression()?;
        self.skip_whitespace();
        if self.current() != Some(')') {
            return Err(EvalError::new(
                ErrorKind::UnmatchedParenthesis,
                open..self.pos + 1,
            ));
        }
        self.next();
        self.depth -= 1;
        Ok(value)
    }

    fn number<T: Number>(&mut self) -> Result<T, EvalError> {
        let start = self.pos;
        let offset = self.offset;
        let mut has_digit = false;
        let mut has_dot = false;
        while let Some(c) = self.current() {
            if c.is_ascii_digit() {
                has_digit = true;
            } else if c == '.' {
                if has_dot {
                    return Err(EvalError::new(
                        ErrorKind::MalformedNumber,
                        start..self.pos + 1,
                    ));
                }
                has_dot = true;
            } else {
                break;
            }
            self.next();
        }
        if !has_digit {
            return Err(self.error(ErrorKind::ExpectedNumber, start));
        }
        let value: T = self.src[offset..self.offset]
            .parse()
            .map_err(|_| self.error(ErrorKind::MalformedNumber, start))?;
        // Literals too large for the value type parse as infinity.
        if !value.is_finite() {
            return Err(self.error(ErrorKind::MalformedNumber, start));
        }
        Ok(value)
    }
}
