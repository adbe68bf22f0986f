//! The definition space — the process-wide registry of uniquely-named,
//! typed definitions.
//!
//! Populated by a single writer on the bootstrap path, then read-mostly
//! for the process lifetime: mutation takes `&mut self`, reads take
//! `&self`, so the single-writer discipline is enforced by the borrow
//! checker rather than by documentation.

use std::any::{Any, TypeId};
use std::collections::BTreeSet;

use tracing::debug;

use crate::error::DefinitionError;

/// A uniquely-named, typed entity registered in the definition space.
///
/// Each kind declares a naming convention through [`Definition::prefix`];
/// a registered name must start with its kind's prefix.
pub trait Definition: Any + Send + Sync {
    /// The globally unique name of this definition.
    fn name(&self) -> &str;

    /// The prefix every name of this kind must carry (e.g. `"Do"`).
    fn prefix(&self) -> &'static str;
}

/// Short kind name for diagnostics: the last path segment of the type name.
fn kind_of<D: Definition>() -> &'static str {
    let full = std::any::type_name::<D>();
    full.rsplit("::").next().unwrap_or(full)
}

struct Entry {
    kind: &'static str,
    type_id: TypeId,
    definition: Box<dyn Definition>,
}

/// Registry mapping unique names to typed definitions, with explicit
/// start/stop lifecycle. Not safe for concurrent mutation.
#[derive(Default)]
pub struct DefinitionSpace {
    // first-registration order; retrieval never depends on it
    entries: Vec<Entry>,
}

impl DefinitionSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Fails on a duplicate name or a name that
    /// violates the kind's naming convention.
    pub fn register<D: Definition>(&mut self, definition: D) -> Result<(), DefinitionError> {
        let name = definition.name();
        let prefix = definition.prefix();
        if !name.starts_with(prefix) || name.len() == prefix.len() {
            return Err(DefinitionError::BadName {
                name: name.to_string(),
                prefix,
                kind: kind_of::<D>(),
            });
        }
        if self.contains(name) {
            return Err(DefinitionError::Duplicate {
                name: name.to_string(),
            });
        }
        debug!(definition = %name, kind = kind_of::<D>(), "Registered definition");
        self.entries.push(Entry {
            kind: kind_of::<D>(),
            type_id: TypeId::of::<D>(),
            definition: Box::new(definition),
        });
        Ok(())
    }

    /// Existence check, no side effects.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.definition.name() == name)
    }

    /// Look up a definition by name, expecting the given kind.
    pub fn resolve<D: Definition>(&self, name: &str) -> Result<&D, DefinitionError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.definition.name() == name)
            .ok_or_else(|| DefinitionError::NotFound {
                name: name.to_string(),
                kind: kind_of::<D>(),
                known: self
                    .entries
                    .iter()
                    .map(|e| e.definition.name().to_string())
                    .collect(),
            })?;
        (entry.definition.as_ref() as &dyn Any)
            .downcast_ref::<D>()
            .ok_or_else(|| DefinitionError::KindMismatch {
                name: name.to_string(),
                expected: kind_of::<D>(),
                actual: entry.kind,
            })
    }

    /// All definitions of the given kind, sorted by name ascending.
    /// Registration order plays no part in the result.
    pub fn get_all<D: Definition>(&self) -> Vec<&D> {
        let wanted = TypeId::of::<D>();
        let mut found: Vec<&D> = self
            .entries
            .iter()
            .filter(|e| e.type_id == wanted)
            .filter_map(|e| (e.definition.as_ref() as &dyn Any).downcast_ref::<D>())
            .collect();
        found.sort_by(|a, b| a.name().cmp(b.name()));
        found
    }

    /// The distinct kinds currently present.
    pub fn get_all_types(&self) -> BTreeSet<&'static str> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    /// Lifecycle start. The space is assumed pre-populated by now.
    pub fn start(&self) {}

    /// Lifecycle stop: clears all entries. The space becomes reusable only
    /// by re-registering from scratch.
    pub fn stop(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct DomainDefinition {
        name: String,
    }

    impl DomainDefinition {
        fn new(name: &str) -> Self {
            Self { name: name.into() }
        }
    }

    impl Definition for DomainDefinition {
        fn name(&self) -> &str {
            &self.name
        }
        fn prefix(&self) -> &'static str {
            "Do"
        }
    }

    struct TaskDefinition {
        name: String,
    }

    impl Definition for TaskDefinition {
        fn name(&self) -> &str {
            &self.name
        }
        fn prefix(&self) -> &'static str {
            "Tk"
        }
    }

    #[test]
    fn duplicate_name_fails_on_second_registration() {
        let mut space = DefinitionSpace::new();
        space.register(DomainDefinition::new("DoMoney")).unwrap();
        let err = space
            .register(DomainDefinition::new("DoMoney"))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::Duplicate { .. }));
    }

    struct DtoDefinition {
        name: String,
    }

    impl Definition for DtoDefinition {
        fn name(&self) -> &str {
            &self.name
        }
        fn prefix(&self) -> &'static str {
            "Do"
        }
    }

    #[test]
    fn names_are_unique_across_kinds() {
        let mut space = DefinitionSpace::new();
        space.register(DomainDefinition::new("DoShared")).unwrap();
        // a different kind sharing the "Do" prefix still collides by name
        let err = space
            .register(DtoDefinition {
                name: "DoShared".into(),
            })
            .unwrap_err();
        assert!(matches!(err, DefinitionError::Duplicate { .. }));

        space.register(DomainDefinition::new("DoOther")).unwrap();
        assert_eq!(space.len(), 2);
    }

    #[test]
    fn naming_convention_is_enforced() {
        let mut space = DefinitionSpace::new();
        let err = space.register(DomainDefinition::new("Money")).unwrap_err();
        assert!(matches!(err, DefinitionError::BadName { .. }));

        // the prefix alone is not a name
        let err = space.register(DomainDefinition::new("Do")).unwrap_err();
        assert!(matches!(err, DefinitionError::BadName { .. }));
    }

    #[test]
    fn resolve_by_name_and_kind() {
        let mut space = DefinitionSpace::new();
        space.register(DomainDefinition::new("DoMoney")).unwrap();
        space
            .register(TaskDefinition {
                name: "TkCleanup".into(),
            })
            .unwrap();

        let def: &DomainDefinition = space.resolve("DoMoney").unwrap();
        assert_eq!(def.name(), "DoMoney");

        let err = space.resolve::<DomainDefinition>("TkCleanup").unwrap_err();
        assert!(matches!(err, DefinitionError::KindMismatch { .. }));
    }

    #[test]
    fn resolve_missing_reports_known_names() {
        let mut space = DefinitionSpace::new();
        space.register(DomainDefinition::new("DoMoney")).unwrap();

        let err = space.resolve::<DomainDefinition>("DoMissing").unwrap_err();
        match err {
            DefinitionError::NotFound { known, .. } => {
                assert_eq!(known, vec!["DoMoney".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn get_all_sorts_by_name_not_registration_order() {
        let mut space = DefinitionSpace::new();
        space.register(DomainDefinition::new("DoZeta")).unwrap();
        space.register(DomainDefinition::new("DoAlpha")).unwrap();

        let names: Vec<&str> = space
            .get_all::<DomainDefinition>()
            .iter()
            .map(|d| d.name())
            .collect();
        assert_eq!(names, vec!["DoAlpha", "DoZeta"]);
    }

    #[test]
    fn get_all_types_lists_distinct_kinds() {
        let mut space = DefinitionSpace::new();
        space.register(DomainDefinition::new("DoMoney")).unwrap();
        space.register(DomainDefinition::new("DoDate")).unwrap();
        space
            .register(TaskDefinition {
                name: "TkCleanup".into(),
            })
            .unwrap();

        let kinds = space.get_all_types();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains("DomainDefinition"));
        assert!(kinds.contains("TaskDefinition"));
    }

    #[test]
    fn stop_clears_the_space() {
        let mut space = DefinitionSpace::new();
        space.register(DomainDefinition::new("DoMoney")).unwrap();
        space.start();
        space.stop();

        assert!(space.is_empty());
        assert!(!space.contains("DoMoney"));
        // reusable by re-registering from scratch
        space.register(DomainDefinition::new("DoMoney")).unwrap();
        assert_eq!(space.len(), 1);
    }
}
