//! Grouping of decoded entries by context.

use std::collections::BTreeMap;

use crate::types::{ContextGroup, TranslationEntry};

/// Splits entries into one [`ContextGroup`] per context.
///
/// Groups come back sorted by context name. Inside a group, entries keep the order
/// in which they were passed in.
pub fn group_by_context(entries: impl IntoIterator<Item = TranslationEntry>) -> Vec<ContextGroup> {
    let mut groups: BTreeMap<String, ContextGroup> = BTreeMap::new();

    for entry in entries {
        groups
            .entry(entry.context.clone())
            .or_insert_with_key(|name| ContextGroup::new(name.clone()))
            .push(entry);
    }

    groups.into_values().collect()
}
