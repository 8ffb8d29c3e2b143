//! Library components of the dengue report CLI.

pub mod logging;
pub mod pipeline;
