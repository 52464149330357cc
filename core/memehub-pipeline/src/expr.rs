use serde_json::Value;

/// A computed value, evaluated against one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Value at a dotted field path; missing reads as null.
    Field(String),
    Literal(Value),
    /// Length of an array. Applying it to a non-array fails the query.
    Size(Box<Expr>),
    Add(Vec<Expr>),
    Multiply(Vec<Expr>),
    /// `numerator / denominator`, defined as 0 when the denominator is 0.
    DivideOrZero(Box<Expr>, Box<Expr>),
    /// Rounds half to even at the given number of decimal places.
    Round(Box<Expr>, u32),
}

impl Expr {
    pub fn field(path: impl Into<String>) -> Self {
        Self::Field(path.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    #[must_use]
    pub fn size(inner: Self) -> Self {
        Self::Size(Box::new(inner))
    }

    #[must_use]
    pub fn divide_or_zero(numerator: Self, denominator: Self) -> Self {
        Self::DivideOrZero(Box::new(numerator), Box::new(denominator))
    }

    #[must_use]
    pub fn round(inner: Self, places: u32) -> Self {
        Self::Round(Box::new(inner), places)
    }

    /// `inner * factor`, the common weighted-term shape.
    #[must_use]
    pub fn scaled(inner: Self, factor: f64) -> Self {
        Self::Multiply(vec![inner, Self::literal(factor)])
    }
}

/// Folds many documents into one value (group outputs and window fields).
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Number of documents.
    Count,
    /// Sum of a numeric expression; non-numeric values are skipped.
    Sum(Expr),
    /// Largest value of an expression under the store's value ordering.
    Max(Expr),
}
