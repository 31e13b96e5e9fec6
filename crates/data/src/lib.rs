//! Data loading and validation for rule profiles and board content.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
