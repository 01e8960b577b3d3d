//! Callback fan-out for inbound events
//!
//! Subscribers are called synchronously, in registration order, on the
//! caller's thread. A dispatch works on the list as it stood when the
//! dispatch began.

pub mod registry;

pub use registry::{invoke_all, Callback, CallbackResult, DispatchRegistry};
