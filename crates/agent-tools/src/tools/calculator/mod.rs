//! Calculator tool for safe math expression evaluation.
//!
//! Expressions are tokenized and evaluated by a small recursive-descent
//! parser. Only numbers, arithmetic operators, parentheses and a fixed set of
//! constants and functions are understood, so nothing else can be reached
//! from an expression.

mod lexer;
mod parser;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::error::ToolError;
use crate::schema::{FieldSpec, FieldType, ToolSchema};
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("invalid syntax: {0}")]
    Syntax(String),

    #[error("name '{0}' is not defined")]
    UndefinedName(String),

    #[error("'{0}' is not callable")]
    NotCallable(String),

    #[error("{name}() takes {expected} ({given} given)")]
    Arity {
        name: String,
        expected: String,
        given: usize,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("math domain error in {0}()")]
    Domain(&'static str),

    #[error("result is not a finite number")]
    NonFinite,
}

/// Evaluate an expression to a number.
pub fn eval_number(expression: &str) -> Result<f64, CalcError> {
    let tokens = lexer::tokenize(expression)?;
    parser::evaluate(&tokens)
}

/// Render a result: integral values without a fraction, very large or very
/// small magnitudes in scientific notation.
pub fn format_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let magnitude = value.abs();

    if value.fract() == 0.0 && magnitude < 1e15 {
        format!("{:.0}", value)
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Evaluate `expression` and format it as `"<expression> = <result>"`.
pub fn evaluate(expression: &str) -> Result<String, ToolError> {
    match eval_number(expression) {
        Ok(result) => Ok(format!("{} = {}", expression, format_number(result))),
        Err(e) => Err(ToolError::EvalError(format!(
            "Failed to evaluate '{}': {}",
            expression, e
        ))),
    }
}

/// Calculator tool that safely evaluates mathematical expressions.
///
/// # Parameters
///
/// - `expression` (required): The mathematical expression to evaluate.
///
/// # Examples
///
/// ```json
/// {"expression": "2 + 3 * 4"}
/// {"expression": "sqrt(16) + sin(pi/2)"}
/// {"expression": "2^10"}
/// ```
pub struct Calculator;

impl Calculator {
    /// Create a new calculator tool.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluates mathematical expressions safely. Supports + - * / // % and powers \
         (** or ^), parentheses, the constants pi and e, and the functions abs, round, \
         min, max, sum, pow, sqrt, sin, cos, tan, log, log10 and exp."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![FieldSpec::required(
            "expression",
            FieldType::String,
            "Expression to evaluate, e.g. '2 + 3 * 4' or 'sqrt(16)'",
        )])
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let expression = args.get_string("expression")?;

        debug!("Evaluating expression: {}", expression);

        let text = evaluate(&expression)?;
        debug!("Result: {}", text);
        Ok(ToolOutput::success(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::collections::HashMap;

    fn make_args(expr: &str) -> ToolArgs {
        let mut params = HashMap::new();
        params.insert("expression".to_string(), Value::String(expr.to_string()));
        ToolArgs::new(params)
    }

    #[tokio::test]
    async fn test_basic_arithmetic() {
        let calc = Calculator::new();

        let result = calc.execute(make_args("2 + 2")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.content, "2 + 2 = 4");

        let result = calc.execute(make_args("15 / 3")).await.unwrap();
        assert_eq!(result.content, "15 / 3 = 5");

        let result = calc.execute(make_args("10 / 4")).await.unwrap();
        assert_eq!(result.content, "10 / 4 = 2.5");
    }

    #[tokio::test]
    async fn test_order_of_operations() {
        let calc = Calculator::new();

        let result = calc.execute(make_args("2 + 3 * 4")).await.unwrap();
        assert_eq!(result.content, "2 + 3 * 4 = 14");

        let result = calc.execute(make_args("(2 + 3) * 4")).await.unwrap();
        assert_eq!(result.content, "(2 + 3) * 4 = 20");
    }

    #[tokio::test]
    async fn test_functions_and_constants() {
        let calc = Calculator::new();

        let result = calc.execute(make_args("sqrt(16) + sin(pi/2)")).await.unwrap();
        assert_eq!(result.content, "sqrt(16) + sin(pi/2) = 5");

        let result = calc.execute(make_args("2^10")).await.unwrap();
        assert_eq!(result.content, "2^10 = 1024");
    }

    #[tokio::test]
    async fn test_code_injection_rejected() {
        let calc = Calculator::new();

        for expr in [
            "__import__('os').system('ls')",
            "open('/etc/passwd')",
            "().__class__",
            "x = 1",
        ] {
            let err = calc.execute(make_args(expr)).await.unwrap_err();
            assert!(matches!(err, ToolError::EvalError(_)), "{:?} was accepted", expr);
        }
    }

    #[test]
    fn test_error_messages() {
        let err = evaluate("1/0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Evaluation error: Failed to evaluate '1/0': division by zero"
        );

        let err = evaluate("foo + 1").unwrap_err();
        assert!(err.to_string().contains("name 'foo' is not defined"));

        let err = evaluate("1e400").unwrap_err();
        assert!(err.to_string().ends_with("result is not a finite number"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e20), "1e20");
        assert_eq!(format_number(0.00001), "1e-5");
    }
}
