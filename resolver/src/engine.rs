//! Priority-ordered resolution of option tokens.
//!
//! The engine consumes tokens in order, applies the tier override rules,
//! chases expansions and implicit requirements depth-first, accumulates
//! multi-valued options, and maintains the authoritative per-option state
//! plus the audit history that canonicalization replays.
//!
//! Synthesized token lists are processed through an explicit frame stack
//! rather than recursion. Each frame owns its token list and cursor, so a
//! value-taking option can never consume a token across a list boundary,
//! and each frame carries the chain of options that caused it — the cycle
//! guard checks that chain before opening a new frame.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use optstack_core::{
    OptionDefinition, OptionValue, OptionValueDescription, OptionsData, Priority,
    UnparsedOptionValueDescription,
};

use crate::error::{ParseError, Result};
use crate::grammar::{self, Classified, ParsedToken, TokenValue};

/// Authoritative state for one option.
#[derive(Debug)]
enum ParsedEntry {
    Single(OptionValueDescription),
    Multiple(Vec<OptionValueDescription>),
}

/// One token list being consumed: the caller-supplied list, or a list
/// synthesized from an option's expansion or implicit requirements.
#[derive(Debug)]
struct Frame {
    tokens: Vec<String>,
    cursor: usize,
    expanded_from: Option<String>,
    implicit_dependant: Option<String>,
    /// Fixed source label for synthesized frames; `None` for the top level,
    /// where the caller's source function applies.
    constant_source: Option<String>,
    /// Options on the causal chain that led to this frame.
    ancestry: Vec<String>,
}

impl Frame {
    fn top_level(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            cursor: 0,
            expanded_from: None,
            implicit_dependant: None,
            constant_source: None,
            ancestry: Vec::new(),
        }
    }

    fn advance(&mut self) -> Option<String> {
        let token = self.tokens.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }

    fn is_synthesized(&self) -> bool {
        self.constant_source.is_some()
    }

    fn owner_name(&self) -> &str {
        self.expanded_from
            .as_deref()
            .or(self.implicit_dependant.as_deref())
            .unwrap_or("")
    }

    fn source_for(&self, name: &str, source_fn: &dyn Fn(&str) -> String) -> String {
        match &self.constant_source {
            Some(label) => label.clone(),
            None => source_fn(name),
        }
    }
}

/// The resolution engine and its accumulated state.
///
/// Created empty from a resolved schema, mutated only by `parse`, and never
/// implicitly reset.
#[derive(Debug)]
pub(crate) struct ResolutionEngine {
    data: Arc<OptionsData>,
    parsed: HashMap<String, ParsedEntry>,
    unparsed: Vec<UnparsedOptionValueDescription>,
    warnings: Vec<String>,
    pub(crate) allow_residue: bool,
    pub(crate) allow_single_dash_long_options: bool,
}

impl ResolutionEngine {
    pub(crate) fn new(data: Arc<OptionsData>) -> Self {
        Self {
            data,
            parsed: HashMap::new(),
            unparsed: Vec::new(),
            warnings: Vec::new(),
            allow_residue: true,
            allow_single_dash_long_options: false,
        }
    }

    pub(crate) fn data(&self) -> &OptionsData {
        &self.data
    }

    /// Resolves one token list at the given priority. Returns the call's
    /// residue in encountered order.
    ///
    /// An error aborts the call; values committed before the failing token
    /// stay committed.
    pub(crate) fn parse(
        &mut self,
        priority: Priority,
        source_fn: &dyn Fn(&str) -> String,
        args: Vec<String>,
    ) -> Result<Vec<String>> {
        let data = Arc::clone(&self.data);
        let mut residue = Vec::new();
        let mut stack = vec![Frame::top_level(args)];

        loop {
            let Some(top) = stack.len().checked_sub(1) else {
                break;
            };
            let Some(token) = stack[top].advance() else {
                stack.pop();
                continue;
            };

            match grammar::classify(&data, &token, self.allow_single_dash_long_options)? {
                Classified::Plain | Classified::Unknown if stack[top].is_synthesized() => {
                    return Err(ParseError::ExpansionResidue {
                        option: stack[top].owner_name().to_string(),
                        token,
                    });
                }
                Classified::Plain => residue.push(token),
                Classified::Unknown => {
                    if self.allow_residue {
                        residue.push(token);
                    } else {
                        return Err(ParseError::UnknownOption(token));
                    }
                }
                Classified::Option(ParsedToken { definition, value }) => {
                    let (raw, recorded) = match value {
                        TokenValue::Inline(v) => (v.clone(), Some(v)),
                        TokenValue::Implied(v) => (v.to_string(), None),
                        TokenValue::FromNext => {
                            let next = stack[top]
                                .advance()
                                .ok_or_else(|| ParseError::MissingValue(token.clone()))?;
                            (next.clone(), Some(next))
                        }
                    };

                    let name = definition.name.clone();
                    let frame = &stack[top];
                    let expanded_from = frame.expanded_from.clone();
                    let implicit_dependant = frame.implicit_dependant.clone();
                    let explicit = !frame.is_synthesized();
                    let source_label = frame.source_for(&name, source_fn);
                    let ancestry = frame.ancestry.clone();

                    let converted = definition.value_type.convert(&raw).map_err(|source| {
                        ParseError::MalformedValue {
                            option: name.clone(),
                            source,
                        }
                    })?;

                    self.unparsed.push(UnparsedOptionValueDescription {
                        name: name.clone(),
                        unparsed_value: recorded,
                        priority,
                        source: source_label.clone(),
                        explicit,
                    });

                    self.set_value(
                        definition,
                        converted,
                        priority,
                        source_label.clone(),
                        implicit_dependant,
                        expanded_from,
                    );

                    let has_expansion = !definition.expansion.is_empty();
                    let has_requirements = !definition.implicit_requirements.is_empty();
                    if !has_expansion && !has_requirements {
                        continue;
                    }

                    if ancestry.iter().any(|ancestor| ancestor == &name) {
                        let chain = render_chain(&ancestry, &name);
                        return Err(if has_expansion {
                            ParseError::ExpansionCycle { chain }
                        } else {
                            ParseError::ImplicitRequirementCycle { chain }
                        });
                    }

                    let mut chain = ancestry;
                    chain.push(name.clone());

                    // LIFO: the expansion frame is pushed last so it runs
                    // first, then the implicit requirements, then the rest
                    // of the current frame.
                    if has_requirements {
                        stack.push(Frame {
                            tokens: definition.implicit_requirements.clone(),
                            cursor: 0,
                            expanded_from: None,
                            implicit_dependant: Some(name.clone()),
                            constant_source: Some(format!(
                                "implicit requirement of option '--{name}' from {source_label}"
                            )),
                            ancestry: chain.clone(),
                        });
                    }
                    if has_expansion {
                        debug!(option = %name, "Chasing expansion");
                        stack.push(Frame {
                            tokens: definition.expansion.clone(),
                            cursor: 0,
                            expanded_from: Some(name.clone()),
                            implicit_dependant: None,
                            constant_source: Some(format!(
                                "expanded from option '--{name}' from {source_label}"
                            )),
                            ancestry: chain,
                        });
                    }
                }
            }
        }

        Ok(residue)
    }

    fn set_value(
        &mut self,
        definition: &OptionDefinition,
        value: OptionValue,
        priority: Priority,
        source: String,
        implicit_dependant: Option<String>,
        expanded_from: Option<String>,
    ) {
        let desc = OptionValueDescription {
            name: definition.name.clone(),
            value,
            priority,
            source,
            implicit_dependant,
            expanded_from,
        };

        if definition.allow_multiple {
            let entry = self
                .parsed
                .entry(definition.name.clone())
                .or_insert_with(|| ParsedEntry::Multiple(Vec::new()));
            if let ParsedEntry::Multiple(values) = entry {
                values.push(desc);
            }
            return;
        }

        if !self.parsed.contains_key(&definition.name) {
            debug!(option = %definition.name, priority = %desc.priority, "Accepted option value");
            self.parsed
                .insert(definition.name.clone(), ParsedEntry::Single(desc));
            return;
        }

        if let Some(ParsedEntry::Single(existing)) = self.parsed.get_mut(&definition.name) {
            if desc.priority < existing.priority {
                debug!(option = %definition.name, priority = %desc.priority, "Ignored lower-priority value");
                return;
            }

            if let (Some(previous), Some(current)) =
                (&existing.implicit_dependant, &desc.implicit_dependant)
            {
                if previous != current {
                    self.warnings.push(format!(
                        "option '--{}' is implicitly set by both --{previous} and --{current}",
                        definition.name
                    ));
                }
            } else if desc.priority == existing.priority {
                match &desc.expanded_from {
                    Some(parent) if existing.expanded_from.is_none() => {
                        self.warnings.push(format!(
                            "option '--{}' expanded from --{parent} overrides the previously \
                             supplied value '{}'",
                            definition.name, existing.value
                        ));
                    }
                    _ if existing.value != desc.value => {
                        self.warnings.push(format!(
                            "option '--{}' set to '{}' at {} priority, overriding its earlier \
                             value '{}'",
                            definition.name, desc.value, desc.priority, existing.value
                        ));
                    }
                    _ => {}
                }
            }

            *existing = desc;
        }
    }

    /// Authoritative description for an option: the single value, or the
    /// most recently accepted entry of a multi-valued option.
    pub(crate) fn option_value_description(&self, name: &str) -> Option<&OptionValueDescription> {
        match self.parsed.get(name)? {
            ParsedEntry::Single(desc) => Some(desc),
            ParsedEntry::Multiple(values) => values.last(),
        }
    }

    /// All accepted descriptions for an option, in acceptance order.
    pub(crate) fn option_values(&self, name: &str) -> &[OptionValueDescription] {
        match self.parsed.get(name) {
            Some(ParsedEntry::Single(desc)) => std::slice::from_ref(desc),
            Some(ParsedEntry::Multiple(values)) => values,
            None => &[],
        }
    }

    /// Parsed value of an option, falling back to its converted default.
    pub(crate) fn effective_value(&self, name: &str) -> Option<&OptionValue> {
        match self.option_value_description(name) {
            Some(desc) => Some(&desc.value),
            None => self.data.default_value(name),
        }
    }

    /// All authoritative descriptions, in stable definition order.
    /// Multi-valued options contribute each accumulated entry in order.
    pub(crate) fn as_list_of_effective_options(&self) -> Vec<&OptionValueDescription> {
        let mut result = Vec::new();
        for def in self.data.definitions() {
            result.extend(self.option_values(&def.name));
        }
        result
    }

    pub(crate) fn as_list_of_unparsed_options(&self) -> &[UnparsedOptionValueDescription] {
        &self.unparsed
    }

    pub(crate) fn as_list_of_explicit_options(&self) -> Vec<&UnparsedOptionValueDescription> {
        self.unparsed.iter().filter(|u| u.explicit).collect()
    }

    pub(crate) fn contains_explicit_option(&self, name: &str) -> bool {
        self.unparsed.iter().any(|u| u.explicit && u.name == name)
    }

    pub(crate) fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

fn render_chain(ancestry: &[String], name: &str) -> String {
    let start = ancestry.iter().position(|a| a == name).unwrap_or(0);
    let mut parts: Vec<String> = ancestry[start..]
        .iter()
        .map(|ancestor| format!("--{ancestor}"))
        .collect();
    parts.push(format!("--{name}"));
    parts.join(" -> ")
}
