//! Field values and their textual form.
//!
//! The native value node shows [`Value::display_text`]; text typed into the
//! native node comes back through [`Value::parse_like`], which keeps the
//! variant of the current value.

use std::fmt;

use crate::types::Rgba;

/// Value carried by field-like elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Int(i32),
    UInt(u32),
    Float(f32),
    Bool(bool),
    Text(String),
    Color(Rgba),
    /// Selected option index (dropdowns).
    Choice(usize),
    /// Inclusive `(low, high)` pair of a min-max slider.
    IntRange(i32, i32),
    FloatRange(f32, f32),
}

impl Value {
    /// Text shown by the native node.
    ///
    /// `Choice` values are shown as the option text when `options` has it.
    pub fn display_text(&self, options: &[String]) -> String {
        match self {
            Value::Choice(index) => options
                .get(*index)
                .cloned()
                .unwrap_or_else(|| index.to_string()),
            other => other.to_string(),
        }
    }

    /// Parse `text` into the same variant as `self`.
    ///
    /// Returns `None` when the text is not a valid value of that variant.
    pub fn parse_like(&self, text: &str, options: &[String]) -> Option<Value> {
        let text = text.trim();
        match self {
            Value::None => None,
            Value::Int(_) => text.parse().ok().map(Value::Int),
            Value::UInt(_) => text.parse().ok().map(Value::UInt),
            Value::Float(_) => text
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float),
            Value::Bool(_) => match text.to_ascii_lowercase().as_str() {
                "true" | "on" | "1" => Some(Value::Bool(true)),
                "false" | "off" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            Value::Text(_) => Some(Value::Text(text.to_string())),
            Value::Color(_) => Rgba::from_hex(text).map(Value::Color),
            Value::Choice(_) => options
                .iter()
                .position(|option| option == text)
                .or_else(|| text.parse().ok().filter(|i| *i < options.len()))
                .map(Value::Choice),
            Value::IntRange(..) => {
                let (low, high) = parse_pair::<i32>(text)?;
                Some(Value::IntRange(low.min(high), low.max(high)))
            }
            Value::FloatRange(..) => {
                let (low, high) = parse_pair::<f32>(text)?;
                if !(low.is_finite() && high.is_finite()) {
                    return None;
                }
                Some(Value::FloatRange(low.min(high), low.max(high)))
            }
        }
    }

    /// Clamp into `[min, max]` when all three share a numeric variant.
    ///
    /// Each variant clamps in its own domain, so integers never lose
    /// precision. Other combinations pass through unchanged.
    pub fn clamped(self, min: &Value, max: &Value) -> Value {
        match (self, min, max) {
            (Value::Int(v), Value::Int(lo), Value::Int(hi)) => Value::Int(v.max(*lo).min(*hi)),
            (Value::UInt(v), Value::UInt(lo), Value::UInt(hi)) => Value::UInt(v.max(*lo).min(*hi)),
            (Value::Float(v), Value::Float(lo), Value::Float(hi)) => {
                Value::Float(v.max(*lo).min(*hi))
            }
            (Value::IntRange(a, b), Value::Int(lo), Value::Int(hi)) => {
                let (a, b) = (a.max(*lo).min(*hi), b.max(*lo).min(*hi));
                Value::IntRange(a.min(b), a.max(b))
            }
            (Value::FloatRange(a, b), Value::Float(lo), Value::Float(hi)) => {
                let (a, b) = (a.max(*lo).min(*hi), b.max(*lo).min(*hi));
                Value::FloatRange(a.min(b), a.max(b))
            }
            (other, _, _) => other,
        }
    }
}

/// Split `low..high` (or `low, high`) into two parsed ends.
fn parse_pair<T: std::str::FromStr>(text: &str) -> Option<(T, T)> {
    let (low, high) = text.split_once("..").or_else(|| text.split_once(','))?;
    Some((low.trim().parse().ok()?, high.trim().parse().ok()?))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => Ok(()),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Color(v) => write!(f, "{v}"),
            Value::Choice(v) => write!(f, "{v}"),
            Value::IntRange(low, high) => write!(f, "{low}..{high}"),
            Value::FloatRange(low, high) => write!(f, "{low}..{high}"),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::UInt(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<(i32, i32)> for Value {
    fn from((low, high): (i32, i32)) -> Self {
        Value::IntRange(low, high)
    }
}

impl From<(f32, f32)> for Value {
    fn from((low, high): (f32, f32)) -> Self {
        Value::FloatRange(low, high)
    }
}

impl From<Rgba> for Value {
    fn from(value: Rgba) -> Self {
        Value::Color(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        assert_eq!(Value::Int(5).display_text(&[]), "5");
        assert_eq!(Value::Float(1.5).display_text(&[]), "1.5");
        assert_eq!(Value::Bool(true).display_text(&[]), "true");
        let options = vec!["Low".to_string(), "High".to_string()];
        assert_eq!(Value::Choice(1).display_text(&options), "High");
        assert_eq!(Value::Choice(7).display_text(&options), "7");
    }

    #[test]
    fn test_parse_keeps_variant() {
        assert_eq!(Value::Int(0).parse_like(" 42 ", &[]), Some(Value::Int(42)));
        assert_eq!(Value::Int(0).parse_like("4.2", &[]), None);
        assert_eq!(Value::UInt(0).parse_like("-1", &[]), None);
        assert_eq!(Value::Float(0.0).parse_like("NaN", &[]), None);
        assert_eq!(Value::Bool(false).parse_like("On", &[]), Some(Value::Bool(true)));
        assert_eq!(
            Value::Color(Rgba::BLACK).parse_like("#ff0000", &[]),
            Some(Value::Color(Rgba::RED))
        );
        assert_eq!(Value::None.parse_like("x", &[]), None);
    }

    #[test]
    fn test_parse_choice() {
        let options = vec!["Low".to_string(), "High".to_string()];
        assert_eq!(Value::Choice(0).parse_like("High", &options), Some(Value::Choice(1)));
        assert_eq!(Value::Choice(0).parse_like("0", &options), Some(Value::Choice(0)));
        assert_eq!(Value::Choice(0).parse_like("5", &options), None);
    }

    #[test]
    fn test_clamped() {
        let (lo, hi) = (Value::Int(0), Value::Int(10));
        assert_eq!(Value::Int(15).clamped(&lo, &hi), Value::Int(10));
        assert_eq!(
            Value::Float(-1.0).clamped(&Value::Float(0.0), &Value::Float(1.0)),
            Value::Float(0.0)
        );
        assert_eq!(Value::Bool(true).clamped(&lo, &hi), Value::Bool(true));
    }

    #[test]
    fn test_range_text() {
        assert_eq!(Value::IntRange(2, 8).display_text(&[]), "2..8");
        let current = Value::FloatRange(0.0, 1.0);
        assert_eq!(
            current.parse_like(" 0.75 .. 0.25 ", &[]),
            Some(Value::FloatRange(0.25, 0.75))
        );
        assert_eq!(
            Value::IntRange(0, 0).parse_like("3, 9", &[]),
            Some(Value::IntRange(3, 9))
        );
        assert_eq!(Value::IntRange(0, 0).parse_like("3", &[]), None);
    }

    #[test]
    fn test_range_clamped_into_bounds() {
        let (lo, hi) = (Value::Int(0), Value::Int(10));
        assert_eq!(Value::IntRange(-5, 20).clamped(&lo, &hi), Value::IntRange(0, 10));
        assert_eq!(Value::IntRange(7, 3).clamped(&lo, &hi), Value::IntRange(3, 7));
    }

    #[test]
    fn test_clamped_keeps_integer_precision() {
        let (lo, hi) = (Value::Int(0), Value::Int(i32::MAX));
        assert_eq!(Value::Int(16_777_217).clamped(&lo, &hi), Value::Int(16_777_217));

        let (lo, hi) = (Value::UInt(1), Value::UInt(u32::MAX));
        assert_eq!(Value::UInt(4_294_967_295).clamped(&lo, &hi), Value::UInt(u32::MAX));
        assert_eq!(Value::UInt(0).clamped(&lo, &hi), Value::UInt(1));
    }
}
