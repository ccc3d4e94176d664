//! Resolved, immutable option collections.
//!
//! An [`OptionsGroup`] is a statically declared table of definitions — the
//! schema side of the system is plain code, not runtime discovery. An
//! ordered list of groups resolves once into an [`OptionsData`]: definitions
//! in declaration order, lookup indices by name and abbreviation, and each
//! option's pre-converted default. Resolved collections never change, so
//! they are safe to share behind an `Arc`.

use std::collections::HashMap;

use crate::{OptionDefinition, OptionValue, SchemaError, validate_definitions};

/// A statically declared table of option definitions.
///
/// The `name` identifies the table process-wide (it is the registry cache
/// key), and `definitions` produces its definitions in declaration order.
///
/// # Examples
///
/// ```
/// use optstack_core::{OptionDefinition, OptionsData, OptionsGroup};
///
/// fn common_options() -> Vec<OptionDefinition> {
///     vec![OptionDefinition::flag("verbose")]
/// }
///
/// const COMMON: OptionsGroup = OptionsGroup {
///     name: "common",
///     definitions: common_options,
/// };
///
/// let data = OptionsData::from_groups(&[COMMON]).unwrap();
/// assert!(data.get("verbose").is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OptionsGroup {
    /// Unique group name; identifies this table process-wide.
    pub name: &'static str,
    /// Produces this group's definitions in declaration order.
    pub definitions: fn() -> Vec<OptionDefinition>,
}

/// Immutable resolved collection of option definitions.
///
/// Built once per distinct group set, validated on construction, and shared
/// read-only thereafter. Definition order is stable (group order, then
/// declaration order within each group) and drives canonical serialization.
#[derive(Debug)]
pub struct OptionsData {
    definitions: Vec<OptionDefinition>,
    index_by_name: HashMap<String, usize>,
    index_by_abbrev: HashMap<char, usize>,
    defaults: Vec<Option<OptionValue>>,
}

impl OptionsData {
    /// Resolves a definition collection, validating it first.
    ///
    /// # Examples
    ///
    /// ```
    /// use optstack_core::{OptionDefinition, OptionType, OptionsData};
    ///
    /// let data = OptionsData::new(vec![
    ///     OptionDefinition::new("jobs", OptionType::Integer)
    ///         .with_default("1")
    ///         .with_abbrev('j'),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(data.get_by_abbrev('j').unwrap().name, "jobs");
    /// assert!(data.default_value("jobs").is_some());
    /// ```
    pub fn new(definitions: Vec<OptionDefinition>) -> Result<Self, SchemaError> {
        validate_definitions(&definitions)?;

        let mut index_by_name = HashMap::with_capacity(definitions.len());
        let mut index_by_abbrev = HashMap::new();
        let mut defaults = Vec::with_capacity(definitions.len());

        for (index, def) in definitions.iter().enumerate() {
            index_by_name.insert(def.name.clone(), index);
            if let Some(abbrev) = def.abbrev {
                index_by_abbrev.insert(abbrev, index);
            }
            let default = match &def.default_value {
                Some(raw) => Some(def.value_type.convert(raw).map_err(|source| {
                    SchemaError::InvalidDefault {
                        option: def.name.clone(),
                        source,
                    }
                })?),
                None => None,
            };
            defaults.push(default);
        }

        Ok(Self {
            definitions,
            index_by_name,
            index_by_abbrev,
            defaults,
        })
    }

    /// Resolves the concatenation of the given groups, in order.
    pub fn from_groups(groups: &[OptionsGroup]) -> Result<Self, SchemaError> {
        let mut definitions = Vec::new();
        for group in groups {
            definitions.extend((group.definitions)());
        }
        Self::new(definitions)
    }

    /// All definitions in stable definition order.
    pub fn definitions(&self) -> &[OptionDefinition] {
        &self.definitions
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&OptionDefinition> {
        self.index_by_name
            .get(name)
            .map(|&index| &self.definitions[index])
    }

    /// Looks up a definition by single-dash abbreviation.
    pub fn get_by_abbrev(&self, abbrev: char) -> Option<&OptionDefinition> {
        self.index_by_abbrev
            .get(&abbrev)
            .map(|&index| &self.definitions[index])
    }

    /// Pre-converted default value of an option, if it declares one.
    pub fn default_value(&self, name: &str) -> Option<&OptionValue> {
        self.index_by_name
            .get(name)
            .and_then(|&index| self.defaults[index].as_ref())
    }

    /// Number of resolved definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True when the collection has no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OptionType, OptionValue};

    fn group_a() -> Vec<OptionDefinition> {
        vec![
            OptionDefinition::flag("verbose").with_abbrev('v'),
            OptionDefinition::new("jobs", OptionType::Integer).with_default("1"),
        ]
    }

    fn group_b() -> Vec<OptionDefinition> {
        vec![OptionDefinition::new("output", OptionType::Path)]
    }

    #[test]
    fn test_from_groups_preserves_declaration_order() {
        let data = OptionsData::from_groups(&[
            OptionsGroup { name: "a", definitions: group_a },
            OptionsGroup { name: "b", definitions: group_b },
        ])
        .unwrap();

        let names: Vec<&str> = data.definitions().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["verbose", "jobs", "output"]);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_lookup_by_name_and_abbrev() {
        let data = OptionsData::new(group_a()).unwrap();
        assert_eq!(data.get("jobs").unwrap().name, "jobs");
        assert!(data.get("missing").is_none());
        assert_eq!(data.get_by_abbrev('v').unwrap().name, "verbose");
        assert!(data.get_by_abbrev('x').is_none());
    }

    #[test]
    fn test_defaults_are_converted_once() {
        let data = OptionsData::new(group_a()).unwrap();
        assert_eq!(data.default_value("jobs"), Some(&OptionValue::Integer(1)));
        assert_eq!(data.default_value("verbose"), Some(&OptionValue::Bool(false)));
        assert!(data.default_value("missing").is_none());
    }

    #[test]
    fn test_construction_rejects_duplicates_across_groups() {
        let result = OptionsData::from_groups(&[
            OptionsGroup { name: "a", definitions: group_a },
            OptionsGroup { name: "a2", definitions: group_a },
        ]);
        assert!(result.is_err());
    }
}
