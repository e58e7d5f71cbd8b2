//! Commands - the page layer's entry points into the services
//!
//! Every command takes the [`AppContext`](crate::AppContext) it runs against
//! and returns a serializable view model.

mod auth;
mod dashboard;
mod history;

pub use auth::*;
pub use dashboard::*;
pub use history::*;
