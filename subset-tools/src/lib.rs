pub mod utils;
pub use anyhow::Result;

pub mod extract;
pub use extract::GdalExtractor;

pub mod cli;
