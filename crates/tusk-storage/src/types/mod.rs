//! Core data types shared between the server and storage backends.

mod ids;
mod tasks;
mod users;

pub use ids::*;
pub use tasks::*;
pub use users::*;
