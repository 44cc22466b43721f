//! Recursive-descent evaluator.
//!
//! ```text
//! expr    := term (('+'|'-') term)*
//! term    := unary (('*'|'/'|'//'|'%') unary)*
//! unary   := ('+'|'-') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | IDENT | IDENT '(' args? ')' | '(' expr ')'
//! ```
//!
//! Names resolve only against the fixed constant and function tables below.

use std::f64::consts;

use super::lexer::Token;
use super::CalcError;

const MAX_DEPTH: usize = 64;

const CONSTANTS: &[(&str, f64)] = &[("pi", consts::PI), ("e", consts::E)];

const FUNCTIONS: &[&str] = &[
    "abs", "round", "min", "max", "sum", "pow", "sqrt", "sin", "cos", "tan", "log", "log10",
    "exp",
];

/// Evaluate a token stream.
pub fn evaluate(tokens: &[Token]) -> Result<f64, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::Syntax("empty expression".to_string()));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    match parser.peek() {
        None => Ok(value),
        Some(token) => Err(CalcError::Syntax(format!(
            "unexpected {}",
            token.describe()
        ))),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), CalcError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(CalcError::Syntax(format!(
                "expected {} but found {}",
                expected.describe(),
                token.describe()
            ))),
            None => Err(CalcError::Syntax(format!(
                "expected {} at end of expression",
                expected.describe()
            ))),
        }
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::Syntax("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                value = finite(value + self.term()?)?;
            } else if self.eat(&Token::Minus) {
                value = finite(value - self.term()?)?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(op @ (Token::Star | Token::Slash | Token::DoubleSlash | Token::Percent)) => {
                    op
                }
                _ => return Ok(value),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                Token::Star => finite(value * rhs)?,
                Token::Slash => finite(value / nonzero(rhs)?)?,
                Token::DoubleSlash => finite((value / nonzero(rhs)?).floor())?,
                _ => finite(modulo(value, nonzero(rhs)?))?,
            };
        }
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        self.enter()?;
        let value = if self.eat(&Token::Minus) {
            -self.unary()?
        } else if self.eat(&Token::Plus) {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(value)
    }

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.primary()?;
        if self.eat(&Token::Power) {
            let exponent = self.unary()?;
            return raise(base, exponent);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.advance() {
            Some(Token::Number(n)) => finite(*n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let args = self.arguments()?;
                    call(name, &args)
                } else {
                    constant(name)
                }
            }
            Some(token) => Err(CalcError::Syntax(format!("unexpected {}", token.describe()))),
            None => Err(CalcError::Syntax("unexpected end of expression".to_string())),
        }
    }

    /// Comma-separated arguments after an opening parenthesis.
    fn arguments(&mut self) -> Result<Vec<f64>, CalcError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen)?;
            return Ok(args);
        }
    }
}

fn finite(value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite)
    }
}

fn nonzero(divisor: f64) -> Result<f64, CalcError> {
    if divisor == 0.0 {
        Err(CalcError::DivisionByZero)
    } else {
        Ok(divisor)
    }
}

/// Remainder carrying the sign of the divisor.
fn modulo(value: f64, divisor: f64) -> f64 {
    let rem = value % divisor;
    if rem != 0.0 && (rem < 0.0) != (divisor < 0.0) {
        rem + divisor
    } else {
        rem
    }
}

fn raise(base: f64, exponent: f64) -> Result<f64, CalcError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(CalcError::Domain("pow"));
    }
    finite(base.powf(exponent))
}

fn constant(name: &str) -> Result<f64, CalcError> {
    if let Some((_, value)) = CONSTANTS.iter().find(|(n, _)| *n == name) {
        return Ok(*value);
    }
    if FUNCTIONS.contains(&name) {
        return Err(CalcError::Syntax(format!("function '{}' must be called", name)));
    }
    Err(CalcError::UndefinedName(name.to_string()))
}

fn arity(name: &str, args: &[f64], min: usize, max: Option<usize>) -> Result<(), CalcError> {
    let given = args.len();
    let ok = given >= min && max.map_or(true, |max| given <= max);
    if ok {
        return Ok(());
    }
    let expected = match max {
        Some(max) if max == min => format!("exactly {}", plural(min)),
        Some(max) => format!("{} to {}", min, plural(max)),
        None => format!("at least {}", plural(min)),
    };
    Err(CalcError::Arity {
        name: name.to_string(),
        expected,
        given,
    })
}

fn plural(n: usize) -> String {
    if n == 1 {
        "1 argument".to_string()
    } else {
        format!("{} arguments", n)
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, CalcError> {
    let value = match name {
        "abs" => {
            arity(name, args, 1, Some(1))?;
            args[0].abs()
        }
        "round" => {
            arity(name, args, 1, Some(2))?;
            round(args[0], args.get(1).copied())?
        }
        "min" => {
            arity(name, args, 1, None)?;
            args.iter().copied().fold(f64::INFINITY, f64::min)
        }
        "max" => {
            arity(name, args, 1, None)?;
            args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        }
        "sum" => {
            arity(name, args, 1, None)?;
            args.iter().sum()
        }
        "pow" => {
            arity(name, args, 2, Some(2))?;
            raise(args[0], args[1])?
        }
        "sqrt" => {
            arity(name, args, 1, Some(1))?;
            if args[0] < 0.0 {
                return Err(CalcError::Domain("sqrt"));
            }
            args[0].sqrt()
        }
        "sin" => {
            arity(name, args, 1, Some(1))?;
            args[0].sin()
        }
        "cos" => {
            arity(name, args, 1, Some(1))?;
            args[0].cos()
        }
        "tan" => {
            arity(name, args, 1, Some(1))?;
            args[0].tan()
        }
        "log" => {
            arity(name, args, 1, Some(2))?;
            if args[0] <= 0.0 {
                return Err(CalcError::Domain("log"));
            }
            match args.get(1).copied() {
                None => args[0].ln(),
                Some(base) if base <= 0.0 => return Err(CalcError::Domain("log")),
                Some(base) => args[0].ln() / nonzero(base.ln())?,
            }
        }
        "log10" => {
            arity(name, args, 1, Some(1))?;
            if args[0] <= 0.0 {
                return Err(CalcError::Domain("log10"));
            }
            args[0].log10()
        }
        "exp" => {
            arity(name, args, 1, Some(1))?;
            args[0].exp()
        }
        _ if CONSTANTS.iter().any(|(n, _)| *n == name) => {
            return Err(CalcError::NotCallable(name.to_string()))
        }
        _ => return Err(CalcError::UndefinedName(name.to_string())),
    };
    finite(value)
}

/// Round half to even, optionally to `digits` decimal places.
fn round(value: f64, digits: Option<f64>) -> Result<f64, CalcError> {
    let Some(digits) = digits else {
        return Ok(value.round_ties_even());
    };
    if digits.fract() != 0.0 {
        return Err(CalcError::InvalidArgument(
            "round() digits must be an integer".to_string(),
        ));
    }
    let scale = 10f64.powi(digits.clamp(-308.0, 308.0) as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return Ok(value);
    }
    Ok(scaled.round_ties_even() / scale)
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn eval(input: &str) -> Result<f64, CalcError> {
        evaluate(&tokenize(input)?)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(eval("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(eval("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(eval("2 * 3 ** 2").unwrap(), 18.0);
    }

    #[test]
    fn test_power() {
        assert_eq!(eval("2^10").unwrap(), 1024.0);
        assert_eq!(eval("2 ** 3 ** 2").unwrap(), 512.0);
        assert_eq!(eval("-2**2").unwrap(), -4.0);
        assert_eq!(eval("(-2)**2").unwrap(), 4.0);
        assert_eq!(eval("2 ** -1").unwrap(), 0.5);
    }

    #[test]
    fn test_floor_division_and_modulo() {
        assert_eq!(eval("7 // 2").unwrap(), 3.0);
        assert_eq!(eval("-7 // 2").unwrap(), -4.0);
        assert_eq!(eval("-7 % 3").unwrap(), 2.0);
        assert_eq!(eval("7 % -3").unwrap(), -2.0);
        assert_eq!(eval("7.5 % 2").unwrap(), 1.5);
    }

    #[test]
    fn test_functions() {
        assert_eq!(eval("sqrt(16) + sin(pi / 2)").unwrap(), 5.0);
        assert_eq!(eval("abs(-5)").unwrap(), 5.0);
        assert_eq!(eval("min(3, 1, 2)").unwrap(), 1.0);
        assert_eq!(eval("max(3, 1, 2)").unwrap(), 3.0);
        assert_eq!(eval("sum(1, 2, 3)").unwrap(), 6.0);
        assert_eq!(eval("pow(2, 3)").unwrap(), 8.0);
        assert_eq!(eval("exp(0)").unwrap(), 1.0);
        assert_eq!(eval("log(e)").unwrap(), 1.0);
        assert_eq!(eval("log10(1000)").unwrap(), 3.0);
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(eval("round(2.5)").unwrap(), 2.0);
        assert_eq!(eval("round(3.5)").unwrap(), 4.0);
        assert_eq!(eval("round(3.14159, 2)").unwrap(), 3.14);
        assert!(matches!(eval("round(1.5, 0.5)"), Err(CalcError::InvalidArgument(_))));
    }

    #[test]
    fn test_arithmetic_errors() {
        assert!(matches!(eval("1 / 0"), Err(CalcError::DivisionByZero)));
        assert!(matches!(eval("5 // 0"), Err(CalcError::DivisionByZero)));
        assert!(matches!(eval("5 % 0"), Err(CalcError::DivisionByZero)));
        assert!(matches!(eval("0 ** -1"), Err(CalcError::DivisionByZero)));
        assert!(matches!(eval("sqrt(-1)"), Err(CalcError::Domain("sqrt"))));
        assert!(matches!(eval("log(0)"), Err(CalcError::Domain("log"))));
        assert!(matches!(eval("log(8, 1)"), Err(CalcError::DivisionByZero)));
        assert!(matches!(eval("(-8) ** 0.5"), Err(CalcError::Domain("pow"))));
        assert!(matches!(eval("10 ** 400"), Err(CalcError::NonFinite)));
        assert!(matches!(eval("exp(1000)"), Err(CalcError::NonFinite)));
    }

    #[test]
    fn test_overflowing_literals() {
        assert!(matches!(eval("1e400"), Err(CalcError::NonFinite)));
        assert!(matches!(eval("-1e400"), Err(CalcError::NonFinite)));
        assert!(matches!(eval("abs(1e400)"), Err(CalcError::NonFinite)));
        assert_eq!(eval("1e308").unwrap(), 1e308);
    }

    #[test]
    fn test_arity() {
        match eval("sqrt(1, 2)") {
            Err(CalcError::Arity { name, given, .. }) => {
                assert_eq!(name, "sqrt");
                assert_eq!(given, 2);
            }
            other => panic!("expected arity error, got {:?}", other),
        }
        assert!(matches!(eval("max()"), Err(CalcError::Arity { .. })));
        assert!(matches!(eval("pow(2)"), Err(CalcError::Arity { .. })));
    }

    #[test]
    fn test_names_outside_allow_list() {
        assert!(matches!(eval("x + 1"), Err(CalcError::UndefinedName(n)) if n == "x"));
        assert!(matches!(eval("exec(1)"), Err(CalcError::UndefinedName(n)) if n == "exec"));
        assert!(matches!(eval("pi(2)"), Err(CalcError::NotCallable(_))));
        assert!(matches!(eval("sqrt + 1"), Err(CalcError::Syntax(_))));
    }

    #[test]
    fn test_syntax_errors() {
        for input in ["", "2 +", "(1", "1)", "1 2", "1..2", "*3", "max(1,)", "2e"] {
            assert!(
                matches!(eval(input), Err(CalcError::Syntax(_))),
                "{:?} should be a syntax error",
                input
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert!(matches!(eval(&deep), Err(CalcError::Syntax(_))));

        let shallow = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(eval(&shallow).unwrap(), 1.0);
    }
}
