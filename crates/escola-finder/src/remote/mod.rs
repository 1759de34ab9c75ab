//! Remote fetch adapter: builds the outbound search request and normalizes
//! whatever shape the school API answers with into [`SchoolRecord`]s.
//!
//! [`SchoolRecord`]: crate::search::SchoolRecord

mod client;
mod mapping;
mod normalizer;
mod parser;
mod query;

pub use client::{decode_schools, FetchError, HttpSchoolSource, SchoolSource};
pub use query::SearchQuery;
