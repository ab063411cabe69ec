pub mod collection;
pub mod openapi;
pub mod scenario;

pub use collection::{load_collection, load_test_case, save_collection, save_test_case};
pub use openapi::load_openapi;
pub use scenario::{load_scenario, save_scenario};
