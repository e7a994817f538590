//! Data connectors: upstream dashboard server REST API.
//!
//! The export core only ever sees raw CSV text; this crate is where that
//! text comes from when the server pulls a view on the caller's behalf.

pub mod tableau;
pub mod types;

pub use tableau::TableauClient;
pub use types::Session;
