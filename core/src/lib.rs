//! Core option definitions, value conversion, and schema validation.
//!
//! This crate defines the foundational types for priority-tiered option
//! resolution:
//!
//! - [`OptionDefinition`] — schema-time description of one option (name,
//!   type, default, category, expansion, implicit requirements,
//!   multiplicity, abbreviation).
//! - [`OptionType`] / [`OptionValue`] — tagged value kinds and the converted
//!   values they produce.
//! - [`Priority`] — the total-ordered origin ladder that decides which value
//!   wins.
//! - [`OptionsGroup`] / [`OptionsData`] — statically declared definition
//!   tables and the immutable resolved collection built from them.
//! - [`OptionValueDescription`] / [`UnparsedOptionValueDescription`] — the
//!   audit records the resolution engine produces.
//!
//! Validation ([`validate_definitions`]) catches structural errors such as
//! duplicate names, negation ambiguities, and defaults that do not convert.
//!
//! The resolution engine itself lives in the `optstack-resolver` crate; this
//! crate has no parsing logic and performs no I/O.
//!
//! # Example
//!
//! ```
//! use optstack_core::*;
//!
//! fn build_options() -> Vec<OptionDefinition> {
//!     vec![
//!         OptionDefinition::flag("keep_going").with_abbrev('k'),
//!         OptionDefinition::new("jobs", OptionType::Integer).with_default("1"),
//!         OptionDefinition::new("define", OptionType::Str).allow_multiple(),
//!     ]
//! }
//!
//! const BUILD: OptionsGroup = OptionsGroup {
//!     name: "build",
//!     definitions: build_options,
//! };
//!
//! let data = OptionsData::from_groups(&[BUILD]).unwrap();
//! assert_eq!(data.len(), 3);
//! assert!(data.get("jobs").unwrap().takes_value());
//! assert_eq!(data.get_by_abbrev('k').unwrap().name, "keep_going");
//! ```

mod convert;
mod data;
mod types;
mod validate;

pub use convert::ConvertError;
pub use data::{OptionsData, OptionsGroup};
pub use types::*;
pub use validate::{SchemaError, validate_definitions};
