//! Request middleware.
//!
//! Lifecycle concerns shared by every route, such as attaching a trace
//! identifier to the request scope and response headers.

pub mod trace;

pub use trace::Trace;
