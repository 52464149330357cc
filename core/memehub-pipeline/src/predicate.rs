use serde_json::Value;

/// Comparison operators usable in a [`Predicate::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Document filter used by [`Stage::Match`](crate::Stage::Match).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every document (an empty match).
    All,
    /// Compares a field against a constant. Array fields match when any
    /// element satisfies the comparison.
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    /// Regular expression search on a string field.
    Regex {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    /// Case-insensitive literal substring search; `needle` is escaped, so
    /// regex metacharacters in user input match themselves.
    pub fn contains_ignore_case(field: impl Into<String>, needle: &str) -> Self {
        Self::Regex {
            field: field.into(),
            pattern: regex_lite::escape(needle),
            case_insensitive: true,
        }
    }

    /// Conjunction that drops `All` members and unwraps a single member.
    #[must_use]
    pub fn and(parts: Vec<Self>) -> Self {
        let mut parts: Vec<Self> = parts.into_iter().filter(|p| *p != Self::All).collect();
        match parts.len() {
            0 => Self::All,
            1 => parts.remove(0),
            _ => Self::And(parts),
        }
    }

    /// Disjunction that unwraps a single member. An empty disjunction is
    /// kept as `Or([])`, which matches nothing.
    #[must_use]
    pub fn or(mut parts: Vec<Self>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Self::Or(parts)
        }
    }
}
