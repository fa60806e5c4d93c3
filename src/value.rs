use std::fmt;

/// Result of evaluating an expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Number(f32),
    Bool(bool),
    Str(String),
    Nil,
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil => "nil",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

/// Rendering used by `print`. Numbers switch to exponent form outside
/// `[1e-4, 1e21)`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&render_number(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Nil => f.write_str("nil"),
        }
    }
}

fn render_number(n: f32) -> String {
    let magnitude = n.abs();
    if n.is_finite() && magnitude != 0.0 && !(1e-4..1e21).contains(&magnitude) {
        let scientific = format!("{n:e}");
        // Rust writes `1e-5`; pad the exponent to two digits with an explicit sign
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{mantissa}e{sign}{:02}", exponent.abs());
            }
        }
        return scientific;
    }
    match n {
        n if n.is_nan() => "NaN".to_string(),
        n if n.is_infinite() && n > 0.0 => "+Inf".to_string(),
        n if n.is_infinite() => "-Inf".to_string(),
        n => n.to_string(),
    }
}

/// Plain decimal rendering with trailing zeros stripped, used for the
/// top-level result of the `parse` command.
pub fn format_number(n: f32) -> String {
    if !n.is_finite() {
        return render_number(n);
    }
    n.to_string()
}
