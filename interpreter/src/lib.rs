//! Evaluates arithmetic expressions such as `-(2 + 3) * 4.5 / 2`.
//!
//! Parsing and evaluation happen in one recursive-descent pass over the
//! input; no tokens or syntax tree are produced along the way.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

mod error;
mod options;
pub mod parser;

pub use error::{ErrorKind, EvalError};
pub use options::{Options, DEFAULT_MAX_DEPTH};
pub use parser::{Evaluator, Number, Operator};

/// Evaluates `input` with the default [`Options`].
pub fn evaluate(input: &str) -> Result<f64, EvalError> {
    evaluate_with(input, &Options::default())
}

pub fn evaluate_with(input: &str, options: &Options) -> Result<f64, EvalError> {
    evaluate_as(input, options)
}

/// Evaluates `input` in an arbitrary floating-point type.
///
/// Division by anything smaller in magnitude than `T::epsilon()` fails with
/// [`ErrorKind::DivisionByZero`].
pub fn evaluate_as<T: Number>(input: &str, options: &Options) -> Result<T, EvalError> {
    debug!(input, "evaluating expression");
    let result = Evaluator::new(input, options).evaluate();
    if let Err(err) = &result {
        debug!(input, error = %err, span = ?err.span, "evaluation failed");
    }
    result
}

/// Evaluates independent expressions in parallel. Results keep the order of
/// `inputs`.
pub fn evaluate_all<S>(inputs: &[S], options: &Options) -> Vec<Result<f64, EvalError>>
where
    S: AsRef<str> + Sync,
{
    #[cfg(feature = "tracy")]
    profiling::scope!("evaluate_all");
    inputs
        .par_iter()
        .map(|input| evaluate_with(input.as_ref(), options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_entry_points() {
        assert_eq!(evaluate("2 + 3 * 4"), Ok(14.0));
        assert_eq!(
            evaluate("10 / 0").unwrap_err().kind(),
            ErrorKind::DivisionByZero
        );
        assert_eq!(evaluate_as::<f32>("1.5 * 2", &Options::default()), Ok(3.0f32));
    }

    #[test]
    fn repeated_evaluation_is_stable() {
        for input in ["(2 + 3) * 4", "2 + * 3", "(2 + 3", ""] {
            assert_eq!(evaluate(input), evaluate(input));
        }
    }

    #[test]
    fn batch_matches_sequential() {
        let inputs: Vec<String> = (0..200)
            .map(|i| match i % 4 {
                0 => format!("{i} * (2 - 1)"),
                1 => format!("{i} / 0"),
                2 => format!("-({i} + 0.5"),
                _ => format!("{i}.{i}"),
            })
            .collect();
        let options = Options::default();
        let batch = evaluate_all(&inputs, &options);
        let sequential: Vec<_> = inputs
            .iter()
            .map(|input| evaluate_with(input, &options))
            .collect();
        assert_eq!(batch, sequential);
    }

    #[test]
    fn batch_respects_options() {
        let options = Options::new().max_depth(1);
        let results = evaluate_all(&["(1)", "((1))"], &options);
        assert_eq!(results[0], Ok(1.0));
        assert_eq!(results[1].as_ref().unwrap_err().kind(), ErrorKind::TooDeep);
    }
}
