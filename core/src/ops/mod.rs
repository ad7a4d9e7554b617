//! API operations, one module per area.
//!
//! Each operation is a mode, a mapping of its parameters onto `Call`
//! arguments, and a decoder for the part of the response it returns.

mod history;
mod jobs;
mod queue;
mod system;
