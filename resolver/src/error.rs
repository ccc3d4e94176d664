//! Error types for parse and canonicalize calls.
//!
//! Every error aborts the current call with a message naming the offending
//! token or option. State committed earlier in the same call is not rolled
//! back; callers should stop using the parser or re-validate after an error.

use optstack_core::{ConvertError, Priority, SchemaError};
use thiserror::Error;

/// Errors raised by parse and canonicalize calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A flag-shaped token names no known option and residue is disallowed.
    #[error("unrecognized option: {0}")]
    UnknownOption(String),
    /// A value-taking option was the last token of its list.
    #[error("expected a value after {0}")]
    MissingValue(String),
    /// A value string failed conversion under the option's declared type.
    #[error("invalid value for option --{option}: {source}")]
    MalformedValue {
        /// Option whose value is malformed.
        option: String,
        /// The underlying conversion failure.
        #[source]
        source: ConvertError,
    },
    /// The `no` prefix was applied to a non-boolean option.
    #[error("illegal use of the 'no' prefix on non-boolean option --{0}")]
    BooleanValueMisuse(String),
    /// Residue is disallowed but some tokens matched no option.
    #[error("unrecognized arguments: {0}")]
    ResidueNotAllowed(String),
    /// A parse call supplied the reserved lowest tier.
    #[error("parse calls may not use the reserved '{0}' priority")]
    InvalidPriority(Priority),
    /// An option's expansion chases back to an option already on its own
    /// causal chain.
    #[error("expansion cycle: {chain}")]
    ExpansionCycle {
        /// The causal chain, rendered `--a -> --b -> --a`.
        chain: String,
    },
    /// An option's implicit requirements chase back to an option already on
    /// its own causal chain.
    #[error("implicit requirement cycle: {chain}")]
    ImplicitRequirementCycle {
        /// The causal chain, rendered `--a -> --b -> --a`.
        chain: String,
    },
    /// A synthesized token list produced a token that matches no option.
    #[error("unparsed token remains after unwrapping --{option}: {token}")]
    ExpansionResidue {
        /// Option whose expansion or implicit requirements were being
        /// unwrapped.
        option: String,
        /// The offending token.
        token: String,
    },
    /// Schema construction failed while building the parser.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
