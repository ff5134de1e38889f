//! Plot functions written as strings, evaluated with `meval`.

use meval::{Context, ContextProvider, Expr};

use super::function::{EvaluationError, Function1, Function2};

thread_local! {
    // `Context` holds `Rc` closures, so every thread keeps its own copy.
    static BUILTINS: Context<'static> = build_context();
}

/// A parsed expression over a fixed list of variable names.
///
/// ```ignore
/// let saddle = Expression::parse("x^2 - y^2", &["x", "y"])?;
/// let plot = HeightFieldPlot::new(&frame).of_function(saddle, 40);
/// ```
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    variables: Vec<String>,
    expr: Expr,
}

impl Expression {
    /// Parses `source` and checks that it only uses `variables` and the
    /// builtin functions and constants.
    pub fn parse(source: &str, variables: &[&str]) -> Result<Self, EvaluationError> {
        let normalized = normalize_expression(source);
        if normalized.is_empty() {
            return Err(EvaluationError::Expression("expression is empty".to_owned()));
        }

        let expr: Expr = normalized
            .parse()
            .map_err(|error: meval::Error| EvaluationError::Expression(error.to_string()))?;

        let expression = Self {
            source: normalized,
            variables: variables.iter().map(|&name| name.to_owned()).collect(),
            expr,
        };

        // Unknown names only surface at evaluation time.
        let zeros = vec![0.0; expression.variables.len()];
        match expression.eval_raw(&zeros) {
            Err(error @ (meval::Error::UnknownVariable(_) | meval::Error::Function(..))) => {
                Err(EvaluationError::Expression(error.to_string()))
            }
            _ => Ok(expression),
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Evaluates with `values` bound to the variables, in order.
    pub fn eval(&self, values: &[f64]) -> Result<f64, EvaluationError> {
        if values.len() != self.variables.len() {
            return Err(EvaluationError::Expression(format!(
                "`{}` takes {} variable(s), got {}",
                self.source,
                self.variables.len(),
                values.len()
            )));
        }
        self.eval_raw(values)
            .map_err(|error| EvaluationError::Expression(error.to_string()))
    }

    fn eval_raw(&self, values: &[f64]) -> Result<f64, meval::Error> {
        let bindings = VariableBindings {
            names: &self.variables,
            values,
        };
        BUILTINS.with(|builtins| self.expr.eval_with_context((&bindings, builtins)))
    }
}

impl Function1 for Expression {
    fn evaluate(&self, t: f64) -> Result<f64, EvaluationError> {
        self.eval(&[t])
    }
}

impl Function2 for Expression {
    fn evaluate(&self, a: f64, b: f64) -> Result<f64, EvaluationError> {
        self.eval(&[a, b])
    }
}

struct VariableBindings<'a> {
    names: &'a [String],
    values: &'a [f64],
}

impl ContextProvider for VariableBindings<'_> {
    fn get_var(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .and_then(|index| self.values.get(index).copied())
    }
}

fn normalize_expression(source: &str) -> String {
    let mut normalized = source.trim().to_owned();
    while normalized.ends_with(';') {
        normalized.pop();
        normalized = normalized.trim_end().to_owned();
    }
    normalized
}

fn build_context() -> Context<'static> {
    let mut context = Context::new();
    context.func("deg", f64::to_degrees);
    context.func("rad", f64::to_radians);
    context.func("frac", f64::fract);
    context.func("sign", f64::signum);
    context.func("sgn", f64::signum);
    context.func("sec", |value| 1.0 / value.cos());
    context.func("csc", |value| 1.0 / value.sin());
    context.func("cot", |value| 1.0 / value.tan());
    context.func2("mod", |a, b| a.rem_euclid(b));
    context.func2("hypot", f64::hypot);
    context.func3("clamp", |value, min, max| value.max(min).min(max));
    context.func3("lerp", |a, b, t| a + (b - a) * t);
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_with_bound_variables() {
        let expr = Expression::parse("exp(y) * cos(x)", &["x", "y"]).unwrap();
        assert_eq!(Function2::evaluate(&expr, 0.0, 0.0), Ok(1.0));

        let expr = Expression::parse("t * cos(t * 20);", &["t"]).unwrap();
        assert_eq!(expr.source(), "t * cos(t * 20)");
        assert_eq!(Function1::evaluate(&expr, 0.0), Ok(0.0));
    }

    #[test]
    fn builtins_and_constants_are_available() {
        let expr = Expression::parse("clamp(u, 0, 1) + sign(v) + pi - pi", &["u", "v"]).unwrap();
        assert_eq!(expr.eval(&[2.0, -3.0]), Ok(0.0));
    }

    #[test]
    fn unknown_names_fail_at_parse_time() {
        assert!(matches!(
            Expression::parse("x + q", &["x", "y"]),
            Err(EvaluationError::Expression(_))
        ));
        assert!(matches!(
            Expression::parse("frobnicate(x)", &["x"]),
            Err(EvaluationError::Expression(_))
        ));
        assert!(matches!(
            Expression::parse("x +* 1", &["x"]),
            Err(EvaluationError::Expression(_))
        ));
        assert!(matches!(Expression::parse("   ", &["x"]), Err(EvaluationError::Expression(_))));
    }

    #[test]
    fn wrong_arity_is_an_error() {
        let expr = Expression::parse("x + y", &["x", "y"]).unwrap();
        assert!(matches!(Function1::evaluate(&expr, 1.0), Err(EvaluationError::Expression(_))));
    }

    #[test]
    fn division_by_zero_is_reported_as_non_finite() {
        let expr = Expression::parse("1 / t", &["t"]).unwrap();
        assert!(matches!(
            Function1::evaluate_finite(&expr, 0.0),
            Err(EvaluationError::NonFinite { .. })
        ));
    }
}
