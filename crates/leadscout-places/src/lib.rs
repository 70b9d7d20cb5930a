pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use client::{PlacesClient, TextSearchRequest};
pub use error::PlacesError;
pub use query::text_query;
pub use types::{SearchTextResponse, TextSearchPage};
