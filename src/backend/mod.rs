//! Execution backends.
//!
//! A generated driver runs either on this host under a local interpreter or
//! on a hosted execution service. Both paths fold their result into
//! [`ExecutionOutcome`](crate::model::ExecutionOutcome); nothing downstream
//! branches on which backend ran.

pub mod local;
pub mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;
