mod matcher;
mod query;

pub use matcher::{parse_price, placeholder_price, ProductMatcher, RawListing};
pub use query::{build_query, SearchTerm, FALLBACK_QUERY};
