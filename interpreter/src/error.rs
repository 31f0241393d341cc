use std::ops::Range;

/// Every way an evaluation can fail. The message of each kind is fixed.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    #[error("unexpected characters in expression")]
    TrailingInput,
    #[error("division by zero is not allowed")]
    DivisionByZero,
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("missing closing parenthesis")]
    UnmatchedParenthesis,
    #[error("invalid number format")]
    MalformedNumber,
    #[error("expected a number")]
    ExpectedNumber,
    #[error("expression nested too deeply")]
    TooDeep,
}

/// A failed evaluation: what went wrong and where.
///
/// `span` counts characters, not bytes, so it can be used directly to
/// underline the offending part of the input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: ErrorKind,
    pub span: Range<usize>,
}

impl EvalError {
    pub fn new(kind: ErrorKind, span: Range<usize>) -> Self {
        EvalError { kind, span }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}
