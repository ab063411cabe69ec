mod api;
mod case;

pub use api::{ApiIndex, NameLookup};
pub use case::CaseIndex;
