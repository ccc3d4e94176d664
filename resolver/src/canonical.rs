//! Deterministic re-serialization of resolved state.
//!
//! Canonicalization turns a token list into the minimal equivalent list:
//! parse once with residue disallowed, then emit one token per
//! single-valued option that differs from its default and one token per
//! accumulated entry of each multi-valued option, in stable definition
//! order. Because output order comes from the schema rather than the input,
//! canonicalizing the output of a canonicalize call reproduces it.

use tracing::debug;

use optstack_core::{OptionDefinition, OptionValue, OptionsGroup, Priority};

use crate::engine::ResolutionEngine;
use crate::error::Result;
use crate::OptionsParser;

/// Canonicalizes a token list against the given option groups.
///
/// The returned list, parsed with the same groups, produces the same
/// authoritative state as the original input, up to cosmetic differences.
///
/// # Examples
///
/// ```
/// use optstack_core::{OptionDefinition, OptionsGroup};
/// use optstack_resolver::canonicalize;
///
/// fn flags() -> Vec<OptionDefinition> {
///     vec![OptionDefinition::flag("verbose"), OptionDefinition::flag("quiet")]
/// }
///
/// const FLAGS: OptionsGroup = OptionsGroup { name: "canonical-doc", definitions: flags };
///
/// // Input order does not matter; definition order does.
/// let tokens = canonicalize(&[FLAGS], &["--quiet", "--verbose"]).unwrap();
/// assert_eq!(tokens, vec!["--verbose", "--quiet"]);
/// ```
pub fn canonicalize<S: AsRef<str>>(groups: &[OptionsGroup], args: &[S]) -> Result<Vec<String>> {
    let mut parser = OptionsParser::new(groups)?;
    parser.set_allow_residue(false);
    parser.parse(Priority::CommandLine, "command line", args)?;
    Ok(parser.as_canonicalized_list())
}

/// Serializes authoritative state back into tokens, in definition order.
pub(crate) fn serialize(engine: &ResolutionEngine) -> Vec<String> {
    let data = engine.data();
    let mut tokens = Vec::new();
    for def in data.definitions() {
        if def.allow_multiple {
            for desc in engine.option_values(&def.name) {
                tokens.push(format_token(def, &desc.value));
            }
        } else if let Some(desc) = engine.option_value_description(&def.name) {
            if data.default_value(&def.name) != Some(&desc.value) {
                tokens.push(format_token(def, &desc.value));
            }
        }
    }
    debug!(count = tokens.len(), "Canonicalized option state");
    tokens
}

fn format_token(def: &OptionDefinition, value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(true) | OptionValue::Void => format!("--{}", def.name),
        OptionValue::Bool(false) => format!("--no{}", def.name),
        other => format!("--{}={other}", def.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optstack_core::OptionType;

    #[test]
    fn test_format_token_forms() {
        let flag = OptionDefinition::flag("keep");
        assert_eq!(format_token(&flag, &OptionValue::Bool(true)), "--keep");
        assert_eq!(format_token(&flag, &OptionValue::Bool(false)), "--nokeep");

        let ping = OptionDefinition::new("ping", OptionType::Void);
        assert_eq!(format_token(&ping, &OptionValue::Void), "--ping");

        let jobs = OptionDefinition::new("jobs", OptionType::Integer);
        assert_eq!(format_token(&jobs, &OptionValue::Integer(8)), "--jobs=8");
    }
}
