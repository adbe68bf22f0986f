//! Selector of types and operations.
//!
//! 1. Define a scope — a set of type descriptors.
//! 2. Filter — compose class and operation predicates (AND only).
//! 3. Find — query the matching types or (type, operation) pairs.
//!
//! The scope freezes on the first filter call and the whole selector
//! freezes on the first query, so predicates are never evaluated against a
//! scope that is still being mutated.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::descriptor::{OperationInfo, TypeInfo};
use crate::error::SelectorError;

type ClassPredicate = Box<dyn Fn(&TypeInfo) -> bool>;
type MethodPredicate = Box<dyn Fn(&OperationInfo) -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Building,
    Filtering,
    Queried,
}

/// A scoped, predicate-based query over type descriptors.
///
/// Scope iteration is deterministic (keyed by full type name), so query
/// results are stable across runs.
pub struct Selector {
    scope: BTreeMap<String, Arc<TypeInfo>>,
    class_predicates: Vec<ClassPredicate>,
    method_predicates: Vec<MethodPredicate>,
    state: State,
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("scope", &self.scope.keys())
            .field("class_predicates", &self.class_predicates.len())
            .field("method_predicates", &self.method_predicates.len())
            .field("state", &self.state)
            .finish()
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector {
    /// Create a selector with an empty scope.
    pub fn new() -> Self {
        Self {
            scope: BTreeMap::new(),
            class_predicates: Vec::new(),
            method_predicates: Vec::new(),
            state: State::Building,
        }
    }

    /// Add a type to the scope. Fails once any filter has been applied.
    pub fn from(&mut self, info: Arc<TypeInfo>) -> Result<&mut Self, SelectorError> {
        if self.state != State::Building {
            return Err(SelectorError::ScopeFrozen);
        }
        self.scope.insert(info.full_name().to_string(), info);
        Ok(self)
    }

    /// Add a set of types to the scope. Fails once any filter has been
    /// applied.
    pub fn from_all(
        &mut self,
        infos: impl IntoIterator<Item = Arc<TypeInfo>>,
    ) -> Result<&mut Self, SelectorError> {
        for info in infos {
            self.from(info)?;
        }
        Ok(self)
    }

    /// Filter scoped types with a predicate. Composes with any prior class
    /// predicate using logical AND. Fails after the first query.
    pub fn filter_classes(
        &mut self,
        predicate: impl Fn(&TypeInfo) -> bool + 'static,
    ) -> Result<&mut Self, SelectorError> {
        if self.state == State::Queried {
            return Err(SelectorError::Queried);
        }
        self.state = State::Filtering;
        self.class_predicates.push(Box::new(predicate));
        Ok(self)
    }

    /// Filter declared operations with a predicate. Composes with any prior
    /// operation predicate using logical AND. Fails after the first query.
    pub fn filter_methods(
        &mut self,
        predicate: impl Fn(&OperationInfo) -> bool + 'static,
    ) -> Result<&mut Self, SelectorError> {
        if self.state == State::Queried {
            return Err(SelectorError::Queried);
        }
        self.state = State::Filtering;
        self.method_predicates.push(Box::new(predicate));
        Ok(self)
    }

    fn class_matches(&self, info: &TypeInfo) -> bool {
        self.class_predicates.iter().all(|p| p(info))
    }

    fn method_matches(&self, op: &OperationInfo) -> bool {
        self.method_predicates.iter().all(|p| p(op))
    }

    /// Find the scoped types matching the class predicate whose declared
    /// operations match the operation predicate.
    ///
    /// A type declaring zero operations passes even when an operation
    /// predicate is set; declared operations are only consulted when they
    /// exist.
    pub fn find_classes(&mut self) -> Vec<Arc<TypeInfo>> {
        self.state = State::Queried;
        self.scope
            .values()
            .filter(|info| self.class_matches(info))
            .filter(|info| {
                if self.method_predicates.is_empty() || info.operations().is_empty() {
                    // no operation predicate, or nothing declared: keep it
                    return true;
                }
                info.operations().iter().any(|op| self.method_matches(op))
            })
            .cloned()
            .collect()
    }

    /// Find every (type, operation) pair among scoped types matching the
    /// class predicate where the directly-declared operation matches the
    /// operation predicate.
    pub fn find_methods(&mut self) -> Vec<(Arc<TypeInfo>, OperationInfo)> {
        self.state = State::Queried;
        self.scope
            .values()
            .filter(|info| self.class_matches(info))
            .flat_map(|info| {
                info.operations()
                    .iter()
                    .filter(|op| self.method_matches(op))
                    .map(|op| (info.clone(), op.clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Standard predicates for selecting a type.
pub struct ClassConditions;

impl ClassConditions {
    /// The type carries the given marker.
    pub fn marked_with(marker: impl Into<String>) -> impl Fn(&TypeInfo) -> bool {
        let marker = marker.into();
        move |info| info.has_marker(&marker)
    }

    /// The type is the given type or implements it.
    pub fn sub_type_of(of: Arc<TypeInfo>) -> impl Fn(&TypeInfo) -> bool {
        move |info| info.is_subtype_of(&of)
    }

    /// The type is an interface.
    pub fn interfaces() -> impl Fn(&TypeInfo) -> bool {
        |info| info.is_interface()
    }
}

/// Standard predicates for selecting an operation.
pub struct MethodConditions;

impl MethodConditions {
    /// The operation carries the given marker.
    pub fn marked_with(marker: impl Into<String>) -> impl Fn(&OperationInfo) -> bool {
        let marker = marker.into();
        move |op| op.has_marker(&marker)
    }
}
