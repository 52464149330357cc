//! Feed pipeline builder.
//!
//! Stage order is fixed: the match stage first, then category sorts, then
//! `sortby` sorts. Several sort stages may be emitted; the store treats the
//! last one as authoritative, so a `sortby` that conflicts with the category
//! overrides it, while one that repeats the category's key is skipped.

use crate::{Expr, Pipeline, Predicate, SortKey, Stage, fields};
use std::str::FromStr;
use tracing::debug;

/// Feed category filter (`category` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Most liked first.
    Trending,
    /// Newest first.
    New,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trending" => Ok(Self::Trending),
            "new" => Ok(Self::New),
            other => Err(format!("unknown category: {other:?}")),
        }
    }
}

/// Feed ordering (`sortby` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Likes,
    Date,
    Comments,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "likes" => Ok(Self::Likes),
            "date" => Ok(Self::Date),
            "comments" => Ok(Self::Comments),
            other => Err(format!("unknown sortby: {other:?}")),
        }
    }
}

/// User-supplied feed filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub sort_by: Option<SortBy>,
}

impl FeedQuery {
    /// Builds a query from raw request parameters.
    ///
    /// Empty strings count as absent and unknown enumeration values are
    /// ignored rather than rejected.
    #[must_use]
    pub fn from_params(
        search: Option<&str>,
        category: Option<&str>,
        sort_by: Option<&str>,
    ) -> Self {
        Self {
            search: non_empty(search).map(str::to_owned),
            category: non_empty(category).and_then(parse_or_ignore),
            sort_by: non_empty(sort_by).and_then(parse_or_ignore),
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

fn parse_or_ignore<T: FromStr<Err = String>>(raw: &str) -> Option<T> {
    raw.parse()
        .map_err(|e| debug!("ignoring feed parameter: {}", e))
        .ok()
}

/// Translates a [`FeedQuery`] into an ordered stage list.
#[derive(Debug, Clone)]
pub struct FeedPipelineBuilder {
    base: Predicate,
}

impl Default for FeedPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedPipelineBuilder {
    /// Builder whose base match accepts every meme.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: Predicate::All,
        }
    }

    /// Builder with a fixed base filter that every feed query is ANDed with.
    #[must_use]
    pub const fn with_base(base: Predicate) -> Self {
        Self { base }
    }

    #[must_use]
    pub fn build(&self, query: &FeedQuery) -> Pipeline {
        let mut filter = vec![self.base.clone()];
        if let Some(search) = &query.search {
            filter.push(Predicate::contains_ignore_case(fields::NAME, search));
        }

        let mut pipeline = Pipeline::new().then(Stage::Match(Predicate::and(filter)));

        match query.category {
            Some(Category::Trending) => pipeline = pipeline.then(sort_desc(fields::LIKES)),
            Some(Category::New) => pipeline = pipeline.then(sort_desc(fields::CREATED_AT)),
            None => {}
        }

        match query.sort_by {
            Some(SortBy::Likes) if query.category != Some(Category::Trending) => {
                pipeline = pipeline.then(sort_desc(fields::LIKES));
            }
            Some(SortBy::Date) if query.category != Some(Category::New) => {
                pipeline = pipeline.then(sort_desc(fields::CREATED_AT));
            }
            Some(SortBy::Comments) => {
                pipeline = pipeline
                    .then(Stage::AddFields(vec![(
                        fields::COMMENT_COUNT.to_owned(),
                        Expr::size(Expr::field(fields::COMMENTS)),
                    )]))
                    .then(sort_desc(fields::COMMENT_COUNT));
            }
            _ => {}
        }

        debug!("built feed pipeline with {} stages for {:?}", pipeline.len(), query);
        pipeline
    }
}

fn sort_desc(field: &str) -> Stage {
    Stage::Sort(vec![SortKey::desc(field)])
}
