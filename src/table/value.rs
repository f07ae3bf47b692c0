use std::fmt;

/// Semantic type of a column, decided once when the table is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

/// A single typed cell value. `Null` is the "no value" marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

/// Parse a float, rejecting the textual specials (`inf`, `NaN`) that `f64::from_str` accepts
fn parse_float(s: &str) -> Option<f64> {
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

pub fn format_float(f: f64) -> String {
    let s = f.to_string();
    if f.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{}.0", s)
    } else {
        s
    }
}

impl ColumnType {
    /// Infer a column type from raw field text. Empty fields are ignored;
    /// a column with no non-empty field is `Text`.
    pub fn infer<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = false;
        let mut all_int = true;

        for field in fields.into_iter().filter(|f| !f.is_empty()) {
            seen = true;
            if all_int && field.parse::<i64>().is_ok() {
                continue;
            }
            all_int = false;
            if parse_float(field).is_none() {
                return ColumnType::Text;
            }
        }

        match (seen, all_int) {
            (false, _) => ColumnType::Text,
            (true, true) => ColumnType::Int,
            (true, false) => ColumnType::Float,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
        }
    }

    /// Parse a raw field read from disk. Only called with fields that
    /// agree with the inferred type, so numeric parsing cannot fail here.
    pub fn parse(&self, field: &str) -> Value {
        if field.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnType::Int => field.parse().map(Value::Int).unwrap_or_else(|_| Value::Text(field.to_string())),
            ColumnType::Float => parse_float(field).map(Value::Float).unwrap_or_else(|| Value::Text(field.to_string())),
            ColumnType::Text => Value::Text(field.to_string()),
        }
    }

    /// Coerce a value into this type.
    ///
    /// Returns `Err(wider)` with the narrowest type able to hold the value when
    /// this type cannot represent it.
    pub fn coerce(&self, value: Value) -> Result<Value, ColumnType> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),

            (ColumnType::Int, Value::Int(i)) => Ok(Value::Int(i)),
            (ColumnType::Int | ColumnType::Float, Value::Float(f)) if !f.is_finite() => {
                Err(ColumnType::Text)
            }
            (ColumnType::Int, Value::Float(f)) => integral(f).map(Value::Int).ok_or(ColumnType::Float),
            (ColumnType::Int, Value::Text(s)) => {
                let t = s.trim();
                if t.is_empty() {
                    Ok(Value::Null)
                } else if let Ok(i) = t.parse::<i64>() {
                    Ok(Value::Int(i))
                } else if parse_float(t).is_some() {
                    Err(ColumnType::Float)
                } else {
                    Err(ColumnType::Text)
                }
            }

            (ColumnType::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (ColumnType::Float, Value::Float(f)) => Ok(Value::Float(f)),
            (ColumnType::Float, Value::Text(s)) => {
                let t = s.trim();
                if t.is_empty() {
                    Ok(Value::Null)
                } else {
                    parse_float(t).map(Value::Float).ok_or(ColumnType::Text)
                }
            }

            (ColumnType::Text, Value::Text(s)) => Ok(Value::Text(s)),
            (ColumnType::Text, v) => Ok(Value::Text(v.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Text form used for display and for writing back to disk. `Null` is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_types() {
        assert_eq!(ColumnType::infer(["30", "25", "35"]), ColumnType::Int);
        assert_eq!(ColumnType::infer(["1.5", "2", ""]), ColumnType::Float);
        assert_eq!(ColumnType::infer(["Paris", "3"]), ColumnType::Text);
        assert_eq!(ColumnType::infer(["", ""]), ColumnType::Text);
        assert_eq!(ColumnType::infer(Vec::<&str>::new()), ColumnType::Text);
        assert_eq!(ColumnType::infer(["nan", "inf"]), ColumnType::Text);
    }

    #[test]
    fn test_coerce_int_column() {
        assert_eq!(ColumnType::Int.coerce(Value::Int(99)), Ok(Value::Int(99)));
        assert_eq!(ColumnType::Int.coerce(Value::Float(4.0)), Ok(Value::Int(4)));
        assert_eq!(ColumnType::Int.coerce("42".into()), Ok(Value::Int(42)));
        assert_eq!(ColumnType::Int.coerce(" ".into()), Ok(Value::Null));
        assert_eq!(ColumnType::Int.coerce(Value::Float(4.5)), Err(ColumnType::Float));
        assert_eq!(ColumnType::Int.coerce("4.5".into()), Err(ColumnType::Float));
        assert_eq!(ColumnType::Int.coerce("abc".into()), Err(ColumnType::Text));
    }

    #[test]
    fn test_coerce_float_and_text_columns() {
        assert_eq!(ColumnType::Float.coerce(Value::Int(2)), Ok(Value::Float(2.0)));
        assert_eq!(ColumnType::Float.coerce("2.25".into()), Ok(Value::Float(2.25)));
        assert_eq!(ColumnType::Float.coerce("x".into()), Err(ColumnType::Text));
        assert_eq!(ColumnType::Float.coerce(Value::Float(f64::NAN)), Err(ColumnType::Text));
        assert_eq!(ColumnType::Int.coerce(Value::Float(f64::INFINITY)), Err(ColumnType::Text));
        assert_eq!(ColumnType::Text.coerce(Value::Int(7)), Ok(Value::Text("7".into())));
        assert_eq!(ColumnType::Text.coerce(Value::Null), Ok(Value::Null));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(30.0).to_string(), "30.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
