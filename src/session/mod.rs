//! Live session ("arc") abstraction
//!
//! The scheduler and applier only see the [`Session`] trait. [`ArcSession`]
//! is the in-memory implementation the binary uses.

mod arc;
mod traits;

pub use arc::{ArcSession, SessionError};
pub use traits::Session;
