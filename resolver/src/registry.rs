//! Process-wide cache of resolved option collections.
//!
//! Resolving a group set is pure computation, but definition tables are
//! fixed per process, so each distinct ordered group list is resolved
//! exactly once and shared. This registry is the only process-wide mutable
//! state in the system: a mutex-guarded "look up or build and insert" map
//! whose values are immutable once built.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use optstack_core::{OptionsData, OptionsGroup, SchemaError};

static REGISTRY: OnceLock<Mutex<HashMap<Vec<&'static str>, Arc<OptionsData>>>> = OnceLock::new();

/// Looks up or builds the resolved collection for an ordered group list.
///
/// Safe under concurrent first access; later lookups share the same
/// immutable [`OptionsData`]. Build failures are returned to the caller and
/// not cached. Group names are the cache key, so a name must identify the
/// same definition table everywhere in the process.
pub fn options_data_for(groups: &[OptionsGroup]) -> Result<Arc<OptionsData>, SchemaError> {
    let key: Vec<&'static str> = groups.iter().map(|group| group.name).collect();
    let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = registry.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(data) = cache.get(&key) {
        return Ok(Arc::clone(data));
    }
    let data = Arc::new(OptionsData::from_groups(groups)?);
    cache.insert(key, Arc::clone(&data));
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use optstack_core::OptionDefinition;

    fn registry_options() -> Vec<OptionDefinition> {
        vec![OptionDefinition::flag("cached")]
    }

    fn broken_options() -> Vec<OptionDefinition> {
        vec![OptionDefinition::flag("x"), OptionDefinition::flag("x")]
    }

    #[test]
    fn test_same_group_list_shares_one_collection() {
        let group = OptionsGroup {
            name: "registry-test-shared",
            definitions: registry_options,
        };
        let first = options_data_for(&[group]).unwrap();
        let second = options_data_for(&[group]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_build_failures_are_not_cached() {
        let group = OptionsGroup {
            name: "registry-test-broken",
            definitions: broken_options,
        };
        assert!(options_data_for(&[group]).is_err());
        assert!(options_data_for(&[group]).is_err());
    }
}
