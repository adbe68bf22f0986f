//! Id resolution for plugins and connectors.
//!
//! By convention a component id is the first-letter-lowercased simple name
//! of its contract type, or of its implementation type when no contract is
//! declared. Repeated ids within one list are disambiguated with a counter
//! that is global to the invocation: the counter starts at 1 and advances
//! on every repeat, whichever base id repeated. The input list must be in
//! document order — the result is only deterministic because it is.

use std::collections::HashSet;

use crate::descriptor::TypeInfo;

/// Canonical base id for a type: its simple name with the first character
/// lowercased.
pub fn component_id(info: &TypeInfo) -> String {
    let simple = info.simple_name();
    let mut chars = simple.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Assign a unique id to every base id, preserving input order.
pub fn unique_ids(bases: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut index = 1;
    bases
        .into_iter()
        .map(|base| {
            if seen.insert(base.clone()) {
                base
            } else {
                let id = format!("{base}#{index}");
                index += 1;
                id
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_id_lowercases_first_char() {
        let info = TypeInfo::builder("demo::SqlConnector").build();
        assert_eq!(component_id(&info), "sqlConnector");
    }

    #[test]
    fn unique_ids_use_a_global_counter() {
        let ids = unique_ids(
            ["a", "b", "a", "c", "a"]
                .into_iter()
                .map(str::to_string),
        );
        assert_eq!(ids, vec!["a", "b", "a#1", "c", "a#2"]);
    }

    #[test]
    fn second_repeated_base_continues_the_same_counter() {
        let ids = unique_ids(
            ["a", "a", "b", "b", "a"]
                .into_iter()
                .map(str::to_string),
        );
        // the counter is shared: b's first repeat takes #2, not #1
        assert_eq!(ids, vec!["a", "a#1", "b", "b#2", "a#3"]);
    }

    #[test]
    fn distinct_bases_pass_through() {
        let ids = unique_ids(["x", "y", "z"].into_iter().map(str::to_string));
        assert_eq!(ids, vec!["x", "y", "z"]);
    }
}
