//! Schema construction validation.
//!
//! Validates structural invariants of a definition collection before it is
//! resolved into an [`OptionsData`](crate::OptionsData): unique names, legal
//! name format, unique abbreviations, negation ambiguities, and defaults
//! that actually convert under their declared type.
//!
//! # Examples
//!
//! ```
//! use optstack_core::{OptionDefinition, OptionType, validate_definitions};
//!
//! let defs = vec![
//!     OptionDefinition::flag("verbose"),
//!     OptionDefinition::new("jobs", OptionType::Integer).with_default("1"),
//! ];
//! assert!(validate_definitions(&defs).is_ok());
//!
//! // Duplicate name → error
//! let dup = vec![OptionDefinition::flag("x"), OptionDefinition::flag("x")];
//! assert!(validate_definitions(&dup).is_err());
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{ConvertError, OptionDefinition, OptionType};

static OPTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").unwrap());

/// Structural problems found while resolving a definition collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two definitions share a name.
    #[error("duplicate option name: --{0}")]
    DuplicateOption(String),
    /// Name is empty or contains characters outside `[a-zA-Z0-9_-]`.
    #[error(
        "invalid option name '{0}': names start with a letter and contain \
         only letters, digits, '-' and '_'"
    )]
    InvalidOptionName(String),
    /// Two definitions share a single-dash abbreviation.
    #[error("duplicate abbreviation '-{0}'")]
    DuplicateAbbreviation(char),
    /// An option is literally named `no<X>` while a boolean option `<X>`
    /// exists, making the `--no<X>` token ambiguous.
    #[error("option --{negated} collides with the negated form of boolean option --{positive}")]
    NegationCollision {
        /// The literally-named `no<X>` option.
        negated: String,
        /// The boolean option whose negation it shadows.
        positive: String,
    },
    /// A void option declared a default value.
    #[error("void option --{0} cannot declare a default value")]
    VoidDefault(String),
    /// A default value fails conversion under the declared type.
    #[error("invalid default for option --{option}: {source}")]
    InvalidDefault {
        /// Option whose default is broken.
        option: String,
        /// The underlying conversion failure.
        #[source]
        source: ConvertError,
    },
}

/// Validates a definition collection, stopping at the first problem.
pub fn validate_definitions(definitions: &[OptionDefinition]) -> Result<(), SchemaError> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut abbrevs: HashSet<char> = HashSet::new();
    let mut booleans: HashSet<&str> = HashSet::new();

    for def in definitions {
        if !OPTION_NAME.is_match(&def.name) {
            return Err(SchemaError::InvalidOptionName(def.name.clone()));
        }
        if !names.insert(&def.name) {
            return Err(SchemaError::DuplicateOption(def.name.clone()));
        }
        if let Some(abbrev) = def.abbrev {
            if !abbrevs.insert(abbrev) {
                return Err(SchemaError::DuplicateAbbreviation(abbrev));
            }
        }
        if def.value_type == OptionType::Bool {
            booleans.insert(def.name.as_str());
        }
        if def.value_type == OptionType::Void && def.default_value.is_some() {
            return Err(SchemaError::VoidDefault(def.name.clone()));
        }
        if let Some(default) = &def.default_value {
            def.value_type
                .convert(default)
                .map_err(|source| SchemaError::InvalidDefault {
                    option: def.name.clone(),
                    source,
                })?;
        }
    }

    for def in definitions {
        if let Some(positive) = def.name.strip_prefix("no") {
            if booleans.contains(positive) {
                return Err(SchemaError::NegationCollision {
                    negated: def.name.clone(),
                    positive: positive.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionDefinition;

    #[test]
    fn test_rejects_duplicate_names() {
        let defs = vec![
            OptionDefinition::flag("verbose"),
            OptionDefinition::new("verbose", OptionType::Str),
        ];
        assert_eq!(
            validate_definitions(&defs),
            Err(SchemaError::DuplicateOption("verbose".into()))
        );
    }

    #[test]
    fn test_rejects_bad_name_format() {
        let defs = vec![OptionDefinition::flag("2fast")];
        assert_eq!(
            validate_definitions(&defs),
            Err(SchemaError::InvalidOptionName("2fast".into()))
        );
        let defs = vec![OptionDefinition::flag("has space")];
        assert!(validate_definitions(&defs).is_err());
    }

    #[test]
    fn test_rejects_duplicate_abbreviation() {
        let defs = vec![
            OptionDefinition::flag("verbose").with_abbrev('v'),
            OptionDefinition::flag("version").with_abbrev('v'),
        ];
        assert_eq!(
            validate_definitions(&defs),
            Err(SchemaError::DuplicateAbbreviation('v'))
        );
    }

    #[test]
    fn test_rejects_negation_collision() {
        let defs = vec![
            OptionDefinition::flag("keep"),
            OptionDefinition::new("nokeep", OptionType::Str),
        ];
        assert_eq!(
            validate_definitions(&defs),
            Err(SchemaError::NegationCollision {
                negated: "nokeep".into(),
                positive: "keep".into(),
            })
        );
    }

    #[test]
    fn test_allows_no_prefix_without_boolean_counterpart() {
        // "notify" starts with "no", but no boolean "tify" exists.
        let defs = vec![OptionDefinition::new("notify", OptionType::Str)];
        assert!(validate_definitions(&defs).is_ok());
    }

    #[test]
    fn test_rejects_void_default_and_bad_default() {
        let defs = vec![OptionDefinition::new("ping", OptionType::Void).with_default("x")];
        assert_eq!(
            validate_definitions(&defs),
            Err(SchemaError::VoidDefault("ping".into()))
        );

        let defs = vec![OptionDefinition::new("jobs", OptionType::Integer).with_default("lots")];
        assert!(matches!(
            validate_definitions(&defs),
            Err(SchemaError::InvalidDefault { .. })
        ));
    }
}
