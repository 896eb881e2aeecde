// ============================================================
// CELL VALUES
// ============================================================
// The four value shapes a dataset cell can hold

use std::fmt;

/// Tokens read as a missing value, in addition to blank cells.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single cell of a tabular dataset
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Text(String),
    Null,
}

impl Value {
    /// Infer a value from raw cell text.
    ///
    /// Blank and NA-like cells are null, integers and finite reals are
    /// numbers, everything else is trimmed text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
            return Value::Null;
        }

        Self::parse_number(trimmed).unwrap_or_else(|| Value::Text(trimmed.to_string()))
    }

    /// Parse text as an integer or finite real, nothing else.
    pub fn parse_number(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if let Ok(int) = trimmed.parse::<i64>() {
            return Some(Value::Int(int));
        }
        match trimmed.parse::<f64>() {
            Ok(real) if real.is_finite() => Some(Value::Real(real)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(int) => Some(*int as f64),
            Value::Real(real) => Some(*real),
            _ => None,
        }
    }

    /// Text written to delimited output. Reals always carry a decimal point so
    /// they read back as reals.
    pub fn render(&self) -> String {
        match self {
            Value::Int(int) => int.to_string(),
            Value::Real(real) => format_real(*real),
            Value::Text(text) => text.clone(),
            Value::Null => String::new(),
        }
    }

    /// Hashable identity used for exact-duplicate detection.
    pub(crate) fn identity(&self) -> ValueIdentity {
        match self {
            Value::Int(int) => ValueIdentity::Int(*int),
            // -0.0 and 0.0 compare equal, so they must share an identity
            Value::Real(real) if *real == 0.0 => ValueIdentity::Real(0f64.to_bits()),
            Value::Real(real) => ValueIdentity::Real(real.to_bits()),
            Value::Text(text) => ValueIdentity::Text(text.clone()),
            Value::Null => ValueIdentity::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueIdentity {
    Int(i64),
    Real(u64),
    Text(String),
    Null,
}

fn format_real(real: f64) -> String {
    let text = real.to_string();
    if real.is_finite() && !text.contains('.') && !text.contains('e') {
        format!("{}.0", text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_value_shapes() {
        assert_eq!(Value::infer(" 42 "), Value::Int(42));
        assert_eq!(Value::infer("3.5"), Value::Real(3.5));
        assert_eq!(Value::infer("Acme"), Value::Text("Acme".to_string()));
        assert_eq!(Value::infer("   "), Value::Null);
        assert_eq!(Value::infer("N/A"), Value::Null);
        assert_eq!(Value::infer("inf"), Value::Text("inf".to_string()));
    }

    #[test]
    fn test_render_keeps_real_marker() {
        assert_eq!(Value::Real(1500.0).render(), "1500.0");
        assert_eq!(Value::Real(-2.25).render(), "-2.25");
        assert_eq!(Value::Int(1500).render(), "1500");
        assert_eq!(Value::Null.render(), "");
    }

    #[test]
    fn test_render_round_trips_through_infer() {
        for value in [Value::Real(10.0), Value::Real(0.1), Value::Int(-7)] {
            assert_eq!(Value::infer(&value.render()), value);
        }
    }

    #[test]
    fn test_signed_zero_shares_identity() {
        assert_eq!(Value::Real(0.0).identity(), Value::Real(-0.0).identity());
    }
}
