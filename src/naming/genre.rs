//! Genre tag selection

use crate::types::TagRule;
use std::collections::HashSet;

/// Reorder, rename and cap a work's raw tags
///
/// Rules are applied first in their configured order: a rule whose source
/// tag is present emits its output and consumes the source. Remaining raw
/// tags follow in their original order, then the list is cut to
/// `max_number` entries. Rules naming absent tags are ignored.
pub fn select_tags(raw_tags: &[String], rules: &[TagRule], max_number: usize) -> Vec<String> {
    let mut selected = Vec::new();
    let mut consumed: HashSet<&str> = HashSet::new();

    for rule in rules {
        if raw_tags.iter().any(|t| t == rule.source()) {
            selected.push(rule.output().to_string());
            consumed.insert(rule.source());
        }
    }

    selected.extend(
        raw_tags
            .iter()
            .filter(|t| !consumed.contains(t.as_str()))
            .cloned(),
    );
    selected.truncate(max_number);
    selected
}
