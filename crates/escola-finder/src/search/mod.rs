//! Search result derivation: quality resolution, predicate filtering, result
//! assembly and the controller that sequences fetches.

mod assembler;
mod controller;
pub mod domain;
mod filter;
mod quality;

pub use assembler::{assemble, ResultAssembler, SearchResults};
pub use controller::{Completion, DisplayState, FetchTicket, SearchController, SearchView};
pub use domain::{EducationLevel, FilterCriteria, Network, QualityMetric, SchoolRecord};
pub use filter::{PredicateFilter, ServerScope};
pub use quality::{resolve_quality, QualityBand};
