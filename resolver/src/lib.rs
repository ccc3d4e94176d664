//! Priority-tiered option resolution, expansion chasing, and
//! canonicalization.
//!
//! This crate resolves a declarative set of option definitions and a
//! sequence of raw command-line tokens — possibly supplied across multiple
//! parse calls, from different origins and priority tiers — into a single
//! consistent, queryable configuration state:
//!
//! - values from higher [`Priority`] tiers override lower ones regardless of
//!   arrival order; within a tier the last value wins and a warning is
//!   recorded when the value changed;
//! - an option with an expansion stands for a fixed token sequence, chased
//!   depth-first as soon as the option is set;
//! - an option with implicit requirements forces other option tokens
//!   whenever it is set;
//! - multi-valued options accumulate every entry instead of overriding;
//! - every accepted token is recorded with its priority, source label, and
//!   provenance, so state can be re-serialized deterministically
//!   ([`canonicalize`]).
//!
//! # Example
//!
//! ```
//! use optstack_core::{OptionDefinition, OptionType, OptionsGroup, Priority};
//! use optstack_resolver::OptionsParser;
//!
//! fn build_options() -> Vec<OptionDefinition> {
//!     vec![
//!         OptionDefinition::flag("verbose"),
//!         OptionDefinition::new("jobs", OptionType::Integer)
//!             .with_default("1")
//!             .with_abbrev('j'),
//!     ]
//! }
//!
//! const BUILD: OptionsGroup = OptionsGroup {
//!     name: "build",
//!     definitions: build_options,
//! };
//!
//! let mut parser = OptionsParser::new(&[BUILD]).unwrap();
//! parser
//!     .parse(Priority::RcFile, ".toolrc", &["--jobs=4"])
//!     .unwrap();
//! parser
//!     .parse(Priority::CommandLine, "command line", &["--verbose", "-j=8"])
//!     .unwrap();
//!
//! // The command line outranks the RC file.
//! assert_eq!(parser.effective_value("jobs").unwrap().as_integer(), Some(8));
//! assert!(parser.contains_explicit_option("verbose"));
//! ```
//!
//! A single parser instance is not safe for concurrent `parse` calls;
//! serialize calls to one instance or use separate instances. The only
//! process-wide state is the schema registry behind
//! [`options_data_for`], which is safe under concurrent first access.

mod canonical;
mod engine;
mod error;
mod grammar;
mod registry;

use std::sync::Arc;

use optstack_core::{
    OptionValue, OptionValueDescription, OptionsData, OptionsGroup, Priority,
    UnparsedOptionValueDescription,
};

pub use canonical::canonicalize;
pub use error::{ParseError, Result};
pub use registry::options_data_for;

use engine::ResolutionEngine;

/// A parser for options.
///
/// Typical use: construct from option groups, call
/// [`parse`](OptionsParser::parse) once per origin in ascending trust order,
/// then query the resolved state. Repeated calls accumulate and override —
/// the parser never implicitly resets.
///
/// A failed parse call leaves the parser in a best-effort partial state:
/// values committed before the failing token remain committed. Callers
/// should stop using the parser or re-validate after an error.
pub struct OptionsParser {
    engine: ResolutionEngine,
    residue: Vec<String>,
    allow_residue: bool,
}

impl OptionsParser {
    /// Creates a parser for the given option groups, resolving their
    /// definitions through the process-wide registry.
    pub fn new(groups: &[OptionsGroup]) -> Result<Self> {
        Ok(Self::from_data(registry::options_data_for(groups)?))
    }

    /// Creates a parser over an already-resolved collection.
    pub fn from_data(data: Arc<OptionsData>) -> Self {
        Self {
            engine: ResolutionEngine::new(data),
            residue: Vec::new(),
            allow_residue: true,
        }
    }

    /// The resolved definition collection this parser works against.
    pub fn options_data(&self) -> &OptionsData {
        self.engine.data()
    }

    /// Controls whether tokens matching no option are collected as residue
    /// (the default) or rejected. When disallowed, a parse call leaving
    /// non-empty residue fails with [`ParseError::ResidueNotAllowed`], and
    /// an unknown flag-shaped token fails immediately with
    /// [`ParseError::UnknownOption`].
    pub fn set_allow_residue(&mut self, allow: bool) {
        self.allow_residue = allow;
        self.engine.allow_residue = allow;
    }

    /// Enables `-name` and `-name=value` as aliases of the double-dash
    /// forms. Off by default; single-character abbreviations declared in
    /// the schema are always recognized.
    pub fn set_allow_single_dash_long_options(&mut self, allow: bool) {
        self.engine.allow_single_dash_long_options = allow;
    }

    /// Parses one token list at the given priority, labelling every value
    /// with the constant `source`. Returns the call's residue.
    ///
    /// May be called multiple times; later calls override earlier values at
    /// equal or lower tiers. [`Priority::Default`] is reserved for built-in
    /// defaults and is rejected.
    pub fn parse<S: AsRef<str>>(
        &mut self,
        priority: Priority,
        source: &str,
        args: &[S],
    ) -> Result<Vec<String>> {
        self.parse_with_source_function(priority, &|_| source.to_string(), args)
    }

    /// Parses one token list, mapping each option name to its source label
    /// through `source_fn`. Labels are diagnostic only and never
    /// interpreted.
    pub fn parse_with_source_function<S: AsRef<str>>(
        &mut self,
        priority: Priority,
        source_fn: &dyn Fn(&str) -> String,
        args: &[S],
    ) -> Result<Vec<String>> {
        if priority == Priority::Default {
            return Err(ParseError::InvalidPriority(priority));
        }
        let tokens: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        let call_residue = self.engine.parse(priority, source_fn, tokens)?;
        self.residue.extend(call_residue.iter().cloned());
        if !self.allow_residue && !self.residue.is_empty() {
            return Err(ParseError::ResidueNotAllowed(self.residue.join(" ")));
        }
        Ok(call_residue)
    }

    /// Authoritative description of an option's current value, or `None` if
    /// no parse call set it. For multi-valued options this is the most
    /// recently accepted entry; use
    /// [`option_values`](OptionsParser::option_values) for the full list.
    pub fn option_value_description(&self, name: &str) -> Option<&OptionValueDescription> {
        self.engine.option_value_description(name)
    }

    /// All accepted descriptions for an option, in acceptance order. Empty
    /// when no parse call set it.
    pub fn option_values(&self, name: &str) -> &[OptionValueDescription] {
        self.engine.option_values(name)
    }

    /// Current value of an option: the parsed value if any parse call set
    /// it, else its converted default, else `None`.
    pub fn effective_value(&self, name: &str) -> Option<&OptionValue> {
        self.engine.effective_value(name)
    }

    /// True iff at least one recorded token for `name` was typed directly
    /// in some parse call, as opposed to being produced by expansion or
    /// implicit requirement.
    pub fn contains_explicit_option(&self, name: &str) -> bool {
        self.engine.contains_explicit_option(name)
    }

    /// All authoritative values, in stable definition order.
    pub fn as_list_of_effective_options(&self) -> Vec<&OptionValueDescription> {
        self.engine.as_list_of_effective_options()
    }

    /// Every accepted token in history order, including entries synthesized
    /// by expansion and implicit requirement.
    pub fn as_list_of_unparsed_options(&self) -> &[UnparsedOptionValueDescription] {
        self.engine.as_list_of_unparsed_options()
    }

    /// The explicit subset of the unparsed history, in history order.
    pub fn as_list_of_explicit_options(&self) -> Vec<&UnparsedOptionValueDescription> {
        self.engine.as_list_of_explicit_options()
    }

    /// Tokens from all parse calls that matched no known option, in
    /// encountered order.
    pub fn residue(&self) -> &[String] {
        &self.residue
    }

    /// Warnings accumulated by all parse calls, in order.
    pub fn warnings(&self) -> &[String] {
        self.engine.warnings()
    }

    /// Serializes the authoritative state into the minimal equivalent token
    /// list, in stable definition order.
    pub fn as_canonicalized_list(&self) -> Vec<String> {
        canonical::serialize(&self.engine)
    }
}
