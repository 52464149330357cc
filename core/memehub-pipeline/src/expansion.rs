/// Populate description: replaces ids stored at `path` with the documents
/// they reference in `from`.
///
/// `select` limits the fields copied from each referenced document (the id
/// is always kept; an empty list keeps everything). `nested` expansions run
/// on the fetched documents before they are embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub path: String,
    pub from: String,
    pub select: Vec<String>,
    pub nested: Vec<Expansion>,
}

impl Expansion {
    pub fn new(path: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: from.into(),
            select: Vec::new(),
            nested: Vec::new(),
        }
    }

    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn nested(mut self, expansion: Self) -> Self {
        self.nested.push(expansion);
        self
    }
}
