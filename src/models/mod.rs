pub mod content;
pub mod filters;
pub mod genres;
pub mod validation;

pub use content::{ContentItem, ContentKind, NormalizedResult, ResultKind};
pub use filters::{
    AppliedFilters, BrowseFilterSet, BrowseParams, BrowseType, SearchParams, SearchQuery, SortKey,
};
pub use genres::Genre;
pub use validation::{ParamValidator, ValidationError};
