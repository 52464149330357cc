use crate::{Accumulator, Expr, Predicate};

/// Sort order of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One key of a compound sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// An output field of a [`Stage::Project`].
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Keeps a top-level field under its own name.
    Include(String),
    /// Sets a field to a computed value.
    Computed(String, Expr),
}

impl Projection {
    pub fn include(field: impl Into<String>) -> Self {
        Self::Include(field.into())
    }

    pub fn computed(field: impl Into<String>, expr: Expr) -> Self {
        Self::Computed(field.into(), expr)
    }
}

/// Left outer join against another collection.
///
/// Every foreign document whose `foreign_field` equals the local value is
/// collected into the array `as_field`. An array-valued local field joins
/// on any of its elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    pub as_field: String,
}

/// Groups documents by a key; the key becomes the output `_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Expr,
    pub accumulators: Vec<(String, Accumulator)>,
}

/// One step of an aggregation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Predicate),
    /// Compound sort. When a pipeline has several sort stages the last one
    /// decides the final order.
    Sort(Vec<SortKey>),
    Limit(usize),
    /// Replaces each document with exactly the listed fields.
    Project(Vec<Projection>),
    Lookup(Lookup),
    AddFields(Vec<(String, Expr)>),
    Group(Group),
    /// Emits one document per element of an array field. Documents where
    /// the field is missing or empty are dropped.
    Unwind(String),
    /// Evaluates accumulators over the whole input and attaches the results
    /// to every document.
    Window(Vec<(String, Accumulator)>),
}

/// Ordered stage list. Built by value (`then`) and never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    #[must_use]
    pub const fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Returns this pipeline with `stage` appended.
    #[must_use]
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Keys of the last sort stage: the order the store will return.
    #[must_use]
    pub fn authoritative_sort(&self) -> Option<&[SortKey]> {
        self.stages.iter().rev().find_map(|stage| match stage {
            Stage::Sort(keys) => Some(keys.as_slice()),
            _ => None,
        })
    }
}
