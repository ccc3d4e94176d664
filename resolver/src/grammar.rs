//! Single-token classification against a resolved schema.
//!
//! The grammar recognizes the long-flag forms (`--name`, `--name=value`,
//! `--noname`), single-character abbreviations (`-c`, `-c=value`), and —
//! when enabled — single-dash long forms (`-name`, `-name=value`). It
//! classifies exactly one token at a time; consuming a following token as a
//! value is the engine's job, because that consumption must not cross a
//! synthesized-list boundary.
//!
//! Boolean and void options never defer to a following token: `--name` sets
//! them outright even when the next token looks like a value. This keeps
//! `--name value` unambiguous for all other types at the cost of making a
//! type change on a boolean or void option backward-incompatible.

use std::sync::LazyLock;

use regex::Regex;

use optstack_core::{OptionDefinition, OptionType, OptionsData};

use crate::error::{ParseError, Result};

// (?s) keeps values with embedded newlines intact.
static LONG_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^--([a-zA-Z][a-zA-Z0-9_-]*)(?:=(.*))?$").unwrap());
static ABBREV_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^-([a-zA-Z])(?:=(.*))?$").unwrap());
static SINGLE_DASH_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^-([a-zA-Z][a-zA-Z0-9_-]*)(?:=(.*))?$").unwrap());

/// How a recognized option token supplies its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenValue {
    /// Inline `--name=value` form.
    Inline(String),
    /// Grammar-implied for valueless boolean/void forms; nothing was typed.
    Implied(&'static str),
    /// The next token of the same list must be consumed as the value.
    FromNext,
}

/// A token recognized as a known option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedToken<'a> {
    pub(crate) definition: &'a OptionDefinition,
    pub(crate) value: TokenValue,
}

/// Classification of one raw token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classified<'a> {
    /// A known option.
    Option(ParsedToken<'a>),
    /// Flag-shaped, but names no known option.
    Unknown,
    /// Not an option token at all.
    Plain,
}

/// Classifies one raw token against the schema.
pub(crate) fn classify<'a>(
    data: &'a OptionsData,
    token: &str,
    allow_single_dash: bool,
) -> Result<Classified<'a>> {
    if let Some(caps) = LONG_FLAG.captures(token) {
        let inline = caps.get(2).map(|m| m.as_str().to_string());
        return resolve_long(data, &caps[1], inline);
    }

    if let Some(caps) = ABBREV_FLAG.captures(token) {
        let abbrev = caps[1].as_bytes()[0] as char;
        let inline = caps.get(2).map(|m| m.as_str().to_string());
        if let Some(def) = data.get_by_abbrev(abbrev) {
            return Ok(Classified::Option(with_value(def, inline)));
        }
        if allow_single_dash {
            return resolve_long(data, &caps[1], inline);
        }
        return Ok(Classified::Unknown);
    }

    if allow_single_dash {
        if let Some(caps) = SINGLE_DASH_FLAG.captures(token) {
            let inline = caps.get(2).map(|m| m.as_str().to_string());
            return resolve_long(data, &caps[1], inline);
        }
    }

    Ok(Classified::Plain)
}

fn resolve_long<'a>(
    data: &'a OptionsData,
    name: &str,
    inline: Option<String>,
) -> Result<Classified<'a>> {
    if let Some(def) = data.get(name) {
        return Ok(Classified::Option(with_value(def, inline)));
    }

    // Negation form: exactly `--noname`, no inline value allowed.
    if inline.is_none() {
        if let Some(positive) = name.strip_prefix("no") {
            if let Some(def) = data.get(positive) {
                if def.value_type != OptionType::Bool {
                    return Err(ParseError::BooleanValueMisuse(positive.to_string()));
                }
                return Ok(Classified::Option(ParsedToken {
                    definition: def,
                    value: TokenValue::Implied("0"),
                }));
            }
        }
    }

    Ok(Classified::Unknown)
}

fn with_value<'a>(def: &'a OptionDefinition, inline: Option<String>) -> ParsedToken<'a> {
    let value = match inline {
        Some(v) => TokenValue::Inline(v),
        None => match def.value_type {
            OptionType::Bool => TokenValue::Implied("1"),
            OptionType::Void => TokenValue::Implied(""),
            _ => TokenValue::FromNext,
        },
    };
    ParsedToken {
        definition: def,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optstack_core::OptionDefinition;

    fn data() -> OptionsData {
        OptionsData::new(vec![
            OptionDefinition::flag("verbose").with_abbrev('v'),
            OptionDefinition::new("jobs", OptionType::Integer).with_abbrev('j'),
            OptionDefinition::new("ping", OptionType::Void),
            OptionDefinition::new("output", OptionType::Path),
        ])
        .unwrap()
    }

    fn expect_option<'a>(classified: Classified<'a>) -> ParsedToken<'a> {
        match classified {
            Classified::Option(parsed) => parsed,
            other => panic!("expected an option, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_value_form() {
        let data = data();
        let parsed = expect_option(classify(&data, "--jobs=8", false).unwrap());
        assert_eq!(parsed.definition.name, "jobs");
        assert_eq!(parsed.value, TokenValue::Inline("8".into()));
    }

    #[test]
    fn test_bare_boolean_and_void_never_defer() {
        let data = data();
        let parsed = expect_option(classify(&data, "--verbose", false).unwrap());
        assert_eq!(parsed.value, TokenValue::Implied("1"));
        let parsed = expect_option(classify(&data, "--ping", false).unwrap());
        assert_eq!(parsed.value, TokenValue::Implied(""));
    }

    #[test]
    fn test_value_taking_option_defers_to_next_token() {
        let data = data();
        let parsed = expect_option(classify(&data, "--output", false).unwrap());
        assert_eq!(parsed.value, TokenValue::FromNext);
    }

    #[test]
    fn test_negation_form() {
        let data = data();
        let parsed = expect_option(classify(&data, "--noverbose", false).unwrap());
        assert_eq!(parsed.definition.name, "verbose");
        assert_eq!(parsed.value, TokenValue::Implied("0"));
    }

    #[test]
    fn test_negation_rejects_non_boolean() {
        let data = data();
        assert_eq!(
            classify(&data, "--nojobs", false),
            Err(ParseError::BooleanValueMisuse("jobs".into()))
        );
    }

    #[test]
    fn test_negation_with_inline_value_is_unknown() {
        let data = data();
        assert_eq!(classify(&data, "--noverbose=1", false).unwrap(), Classified::Unknown);
    }

    #[test]
    fn test_abbreviations() {
        let data = data();
        let parsed = expect_option(classify(&data, "-j=4", false).unwrap());
        assert_eq!(parsed.definition.name, "jobs");
        assert_eq!(parsed.value, TokenValue::Inline("4".into()));
        assert_eq!(classify(&data, "-x", false).unwrap(), Classified::Unknown);
    }

    #[test]
    fn test_single_dash_long_forms_are_opt_in() {
        let data = data();
        assert_eq!(classify(&data, "-jobs=4", false).unwrap(), Classified::Plain);

        let parsed = expect_option(classify(&data, "-jobs=4", true).unwrap());
        assert_eq!(parsed.definition.name, "jobs");
        let parsed = expect_option(classify(&data, "-verbose", true).unwrap());
        assert_eq!(parsed.definition.name, "verbose");
    }

    #[test]
    fn test_residue_candidates() {
        let data = data();
        assert_eq!(classify(&data, "target", false).unwrap(), Classified::Plain);
        assert_eq!(classify(&data, "--", false).unwrap(), Classified::Plain);
        assert_eq!(classify(&data, "--unknown", false).unwrap(), Classified::Unknown);
    }
}
