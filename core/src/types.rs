//! Schema type definitions for option resolution.
//!
//! This module defines the data model shared between schema construction and
//! the resolution engine: option definitions, the priority ladder, typed
//! values, and the audit records the engine produces for every value it
//! accepts. The types are designed for serialization with [`serde`] and can
//! round-trip through JSON.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Origin tier of an option value.
///
/// Tiers form a fixed total order; a value from a higher tier overrides a
/// value from a lower one regardless of arrival order. [`Priority::Default`]
/// is the distinguished lowest tier reserved for built-in defaults — parse
/// calls may not use it.
///
/// # Examples
///
/// ```
/// use optstack_core::Priority;
///
/// assert!(Priority::CommandLine > Priority::RcFile);
/// assert!(Priority::Default < Priority::ComputedDefault);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Priority {
    /// Built-in defaults from option definitions. Reserved; never valid for
    /// an explicit parse call.
    #[default]
    Default,
    /// Defaults computed from the values of other options.
    ComputedDefault,
    /// Values read from an RC file.
    RcFile,
    /// Values derived from the environment.
    Environment,
    /// Values typed on the command line.
    CommandLine,
    /// Invocation policy applied on top of everything else.
    InvocationPolicy,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Default => "default",
            Self::ComputedDefault => "computed-default",
            Self::RcFile => "rc-file",
            Self::Environment => "environment",
            Self::CommandLine => "command-line",
            Self::InvocationPolicy => "invocation-policy",
        };
        f.write_str(label)
    }
}

/// Value type declared by an option definition.
///
/// Selects the converter applied to raw value strings. `Bool` and `Void`
/// options never consume a separate value token: `--name value` leaves
/// `value` untouched for them, so retyping such an option to any other type
/// is a backward-incompatible change.
///
/// # Examples
///
/// ```
/// use optstack_core::OptionType;
///
/// let vt = OptionType::default();
/// assert_eq!(vt, OptionType::Str);
///
/// let format = OptionType::Choice(vec!["json".into(), "text".into()]);
/// assert!(matches!(format, OptionType::Choice(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OptionType {
    /// Boolean flag, settable with `--name`, `--noname`, or `--name=value`.
    Bool,
    /// Fires when present; carries no value at all.
    Void,
    /// Signed integer value.
    Integer,
    /// Floating-point value.
    Float,
    /// Arbitrary string value (the default).
    #[default]
    Str,
    /// Filesystem path.
    Path,
    /// One of a fixed set of choices, matched case-insensitively.
    Choice(Vec<String>),
}

/// A converted option value.
///
/// The variants mirror [`OptionType`]. The `Display` impl renders the
/// canonical string form used when serializing resolved state back into
/// tokens.
///
/// # Examples
///
/// ```
/// use optstack_core::OptionValue;
///
/// let v = OptionValue::Integer(8);
/// assert_eq!(v.as_integer(), Some(8));
/// assert_eq!(v.to_string(), "8");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    /// Boolean value.
    Bool(bool),
    /// Marker for a void option that fired.
    Void,
    /// Signed integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    Str(String),
    /// Filesystem path value.
    Path(PathBuf),
    /// Selected choice, in its declared casing.
    Choice(String),
}

impl OptionValue {
    /// Returns the boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float payload, if any.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string payload for `Str` and `Choice` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the path payload, if any.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Void => Ok(()),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) | Self::Choice(s) => f.write_str(s),
            Self::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Documentation level of an option, derived from its category.
///
/// Only documented options belong in rendered help. Hidden options exist so
/// that protocol-level flags between a client and server are never logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentationLevel {
    /// Shown in help output.
    Documented,
    /// Parseable but omitted from help output.
    Undocumented,
    /// Never surfaced anywhere.
    Hidden,
}

/// Immutable schema-time description of one option.
///
/// Definitions are declared statically in option groups and resolved once
/// into an [`OptionsData`](crate::OptionsData) collection. Use the
/// constructors [`new`](OptionDefinition::new) and
/// [`flag`](OptionDefinition::flag), then chain builder methods.
///
/// # Examples
///
/// ```
/// use optstack_core::{OptionDefinition, OptionType};
///
/// let jobs = OptionDefinition::new("jobs", OptionType::Integer)
///     .with_default("1")
///     .with_abbrev('j');
/// assert_eq!(jobs.name, "jobs");
/// assert!(jobs.takes_value());
///
/// let verbose = OptionDefinition::flag("verbose");
/// assert!(!verbose.takes_value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    /// Option name, unique within a resolved schema.
    pub name: String,
    /// Declared value type, selecting the converter.
    pub value_type: OptionType,
    /// Default value as an unparsed string; `None` means unset.
    pub default_value: Option<String>,
    /// Category driving the documentation level.
    pub category: String,
    /// Whether the option accumulates values instead of overriding.
    pub allow_multiple: bool,
    /// Ordered token sequence this option stands for when set.
    pub expansion: Vec<String>,
    /// Ordered token sequence forced whenever this option is set.
    pub implicit_requirements: Vec<String>,
    /// Optional single-dash, single-character abbreviation.
    pub abbrev: Option<char>,
}

impl OptionDefinition {
    /// Creates a definition with the given name and value type.
    ///
    /// # Examples
    ///
    /// ```
    /// use optstack_core::{OptionDefinition, OptionType};
    ///
    /// let opt = OptionDefinition::new("output", OptionType::Path);
    /// assert_eq!(opt.value_type, OptionType::Path);
    /// assert!(opt.default_value.is_none());
    /// ```
    pub fn new(name: &str, value_type: OptionType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            default_value: None,
            category: "misc".to_string(),
            allow_multiple: false,
            expansion: Vec::new(),
            implicit_requirements: Vec::new(),
            abbrev: None,
        }
    }

    /// Creates a boolean flag definition defaulting to false.
    ///
    /// # Examples
    ///
    /// ```
    /// use optstack_core::{OptionDefinition, OptionType};
    ///
    /// let flag = OptionDefinition::flag("verbose");
    /// assert_eq!(flag.value_type, OptionType::Bool);
    /// assert_eq!(flag.default_value.as_deref(), Some("false"));
    /// ```
    pub fn flag(name: &str) -> Self {
        Self::new(name, OptionType::Bool).with_default("false")
    }

    /// Sets the unparsed default value.
    pub fn with_default(mut self, default_value: &str) -> Self {
        self.default_value = Some(default_value.to_string());
        self
    }

    /// Sets the category.
    pub fn in_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Marks the option as accumulating multiple values.
    pub fn allow_multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }

    /// Sets the expansion token sequence.
    pub fn with_expansion(mut self, tokens: &[&str]) -> Self {
        self.expansion = tokens.iter().map(|t| (*t).to_string()).collect();
        self
    }

    /// Sets the implicit-requirement token sequence.
    pub fn with_implicit_requirements(mut self, tokens: &[&str]) -> Self {
        self.implicit_requirements = tokens.iter().map(|t| (*t).to_string()).collect();
        self
    }

    /// Sets the single-dash abbreviation.
    pub fn with_abbrev(mut self, abbrev: char) -> Self {
        self.abbrev = Some(abbrev);
        self
    }

    /// Whether a separate value token may follow `--name`.
    ///
    /// `Bool` and `Void` options never consume a following token.
    pub fn takes_value(&self) -> bool {
        !matches!(self.value_type, OptionType::Bool | OptionType::Void)
    }

    /// Documentation level derived from the category.
    ///
    /// # Examples
    ///
    /// ```
    /// use optstack_core::{DocumentationLevel, OptionDefinition};
    ///
    /// let opt = OptionDefinition::flag("internal").in_category("hidden");
    /// assert_eq!(opt.documentation_level(), DocumentationLevel::Hidden);
    /// ```
    pub fn documentation_level(&self) -> DocumentationLevel {
        match self.category.as_str() {
            "undocumented" => DocumentationLevel::Undocumented,
            "hidden" => DocumentationLevel::Hidden,
            _ => DocumentationLevel::Documented,
        }
    }
}

/// Authoritative, post-conversion value of one option.
///
/// Records the converted value together with the metadata needed for audit:
/// where it came from, at what priority, and whether it was produced by
/// another option's expansion or implicit requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValueDescription {
    /// Option name.
    pub name: String,
    /// Converted value.
    pub value: OptionValue,
    /// Priority tier the value arrived at.
    pub priority: Priority,
    /// Free-form source label, for diagnostics only.
    pub source: String,
    /// Option whose implicit requirement produced this value, if any.
    pub implicit_dependant: Option<String>,
    /// Option whose expansion produced this value, if any.
    pub expanded_from: Option<String>,
}

impl OptionValueDescription {
    /// True when this value was forced by another option's implicit
    /// requirement.
    pub fn is_implicit_dependency(&self) -> bool {
        self.implicit_dependant.is_some()
    }

    /// True when this value was produced by another option's expansion.
    pub fn is_expansion(&self) -> bool {
        self.expanded_from.is_some()
    }
}

impl fmt::Display for OptionValueDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "option '--{}' set to '{}' at {} priority from {}",
            self.name, self.value, self.priority, self.source
        )
    }
}

/// Pre-conversion record of one accepted token.
///
/// Every token the engine accepts is recorded in call order, whether it was
/// typed at the top level or synthesized by expansion or implicit
/// requirement. `explicit` is true only for the former; synthesized entries
/// were materially present in the effective argument stream but were never
/// independently typed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparsedOptionValueDescription {
    /// Option name.
    pub name: String,
    /// Raw value string; `None` for pure flag forms that carried no value.
    pub unparsed_value: Option<String>,
    /// Priority tier the token arrived at.
    pub priority: Priority,
    /// Free-form source label, for diagnostics only.
    pub source: String,
    /// True iff the token came directly from a caller-supplied list.
    pub explicit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ladder_is_totally_ordered() {
        let ladder = [
            Priority::Default,
            Priority::ComputedDefault,
            Priority::RcFile,
            Priority::Environment,
            Priority::CommandLine,
            Priority::InvocationPolicy,
        ];
        for pair in ladder.windows(2) {
            assert!(pair[0] < pair[1], "{} should rank below {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_option_value_display_forms() {
        assert_eq!(OptionValue::Bool(true).to_string(), "true");
        assert_eq!(OptionValue::Integer(-3).to_string(), "-3");
        assert_eq!(OptionValue::Str("a b".into()).to_string(), "a b");
        assert_eq!(OptionValue::Void.to_string(), "");
        assert_eq!(OptionValue::Path("out/dir".into()).to_string(), "out/dir");
    }

    #[test]
    fn test_definition_builders() {
        let opt = OptionDefinition::new("format", OptionType::Choice(vec!["json".into()]))
            .with_default("json")
            .in_category("output")
            .allow_multiple()
            .with_abbrev('f');

        assert_eq!(opt.default_value.as_deref(), Some("json"));
        assert_eq!(opt.category, "output");
        assert!(opt.allow_multiple);
        assert_eq!(opt.abbrev, Some('f'));
        assert!(opt.takes_value());
    }

    #[test]
    fn test_documentation_level_from_category() {
        assert_eq!(
            OptionDefinition::flag("a").documentation_level(),
            DocumentationLevel::Documented
        );
        assert_eq!(
            OptionDefinition::flag("b")
                .in_category("undocumented")
                .documentation_level(),
            DocumentationLevel::Undocumented
        );
        assert_eq!(
            OptionDefinition::flag("c")
                .in_category("hidden")
                .documentation_level(),
            DocumentationLevel::Hidden
        );
    }

    #[test]
    fn test_definition_serde_round_trip() {
        let opt = OptionDefinition::new("jobs", OptionType::Integer)
            .with_default("1")
            .with_abbrev('j')
            .with_implicit_requirements(&["--load_average=10"]);

        let json = serde_json::to_string(&opt).unwrap();
        let back: OptionDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opt);
    }
}
