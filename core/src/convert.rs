//! Raw string to typed value conversion.
//!
//! Each [`OptionType`] carries its converter: [`OptionType::convert`] turns
//! the raw value string of one token into an [`OptionValue`], or reports a
//! [`ConvertError`] that the resolution engine surfaces as a malformed-value
//! parse error naming the option.

use std::path::PathBuf;

use thiserror::Error;

use crate::{OptionType, OptionValue};

/// A raw value string that does not convert under the declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {expected}")]
pub struct ConvertError {
    /// The offending raw string.
    pub value: String,
    /// Human-readable description of what the type accepts.
    pub expected: String,
}

impl ConvertError {
    fn new(value: &str, expected: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

impl OptionType {
    /// Converts a raw value string under this type.
    ///
    /// `Void` ignores its input entirely; `Str` and `Path` accept anything;
    /// `Choice` matches case-insensitively and yields the declared casing.
    ///
    /// # Examples
    ///
    /// ```
    /// use optstack_core::{OptionType, OptionValue};
    ///
    /// assert_eq!(OptionType::Bool.convert("yes"), Ok(OptionValue::Bool(true)));
    /// assert_eq!(OptionType::Integer.convert("42"), Ok(OptionValue::Integer(42)));
    /// assert!(OptionType::Integer.convert("forty-two").is_err());
    /// ```
    pub fn convert(&self, raw: &str) -> Result<OptionValue, ConvertError> {
        match self {
            Self::Bool => parse_bool(raw)
                .map(OptionValue::Bool)
                .ok_or_else(|| ConvertError::new(raw, "boolean")),
            Self::Void => Ok(OptionValue::Void),
            Self::Integer => raw
                .parse::<i64>()
                .map(OptionValue::Integer)
                .map_err(|_| ConvertError::new(raw, "integer")),
            Self::Float => raw
                .parse::<f64>()
                .map(OptionValue::Float)
                .map_err(|_| ConvertError::new(raw, "floating-point number")),
            Self::Str => Ok(OptionValue::Str(raw.to_string())),
            Self::Path => Ok(OptionValue::Path(PathBuf::from(raw))),
            Self::Choice(choices) => choices
                .iter()
                .find(|choice| choice.eq_ignore_ascii_case(raw))
                .map(|choice| OptionValue::Choice(choice.clone()))
                .ok_or_else(|| {
                    ConvertError::new(raw, format!("one of: {}", choices.join(", ")))
                }),
        }
    }
}

// Full words, single letters, and 0/1 are all accepted boolean spellings.
fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true")
        || raw.eq_ignore_ascii_case("yes")
        || raw.eq_ignore_ascii_case("t")
        || raw.eq_ignore_ascii_case("y")
        || raw == "1"
    {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false")
        || raw.eq_ignore_ascii_case("no")
        || raw.eq_ignore_ascii_case("f")
        || raw.eq_ignore_ascii_case("n")
        || raw == "0"
    {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_accepts_literal_set() {
        for raw in ["1", "true", "TRUE", "t", "yes", "Y"] {
            assert_eq!(OptionType::Bool.convert(raw), Ok(OptionValue::Bool(true)), "{raw}");
        }
        for raw in ["0", "false", "False", "f", "no", "N"] {
            assert_eq!(OptionType::Bool.convert(raw), Ok(OptionValue::Bool(false)), "{raw}");
        }
        assert!(OptionType::Bool.convert("maybe").is_err());
    }

    #[test]
    fn test_void_ignores_input() {
        assert_eq!(OptionType::Void.convert(""), Ok(OptionValue::Void));
        assert_eq!(OptionType::Void.convert("ignored"), Ok(OptionValue::Void));
    }

    #[test]
    fn test_numeric_conversion() {
        assert_eq!(OptionType::Integer.convert("-7"), Ok(OptionValue::Integer(-7)));
        assert!(OptionType::Integer.convert("1.5").is_err());
        assert_eq!(OptionType::Float.convert("1.5"), Ok(OptionValue::Float(1.5)));
        assert!(OptionType::Float.convert("x").is_err());
    }

    #[test]
    fn test_choice_matches_case_insensitively() {
        let format = OptionType::Choice(vec!["Json".into(), "text".into()]);
        assert_eq!(
            format.convert("json"),
            Ok(OptionValue::Choice("Json".into()))
        );
        let err = format.convert("xml").unwrap_err();
        assert!(err.to_string().contains("one of: Json, text"));
    }

    #[test]
    fn test_str_and_path_accept_anything() {
        assert_eq!(
            OptionType::Str.convert("--weird"),
            Ok(OptionValue::Str("--weird".into()))
        );
        assert_eq!(
            OptionType::Path.convert("a/b c"),
            Ok(OptionValue::Path("a/b c".into()))
        );
    }
}
