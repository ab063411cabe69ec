pub mod cli;
pub mod commands;
pub mod convert;
pub mod coverage;
pub mod error;
pub mod index;
pub mod loader;
pub mod merge;
pub mod models;

pub use error::{ApidogError, Result};
