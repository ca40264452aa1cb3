//! Transport-agnostic building blocks for JSON-RPC over a persistent,
//! message-oriented connection.
//!
//! This crate owns the wire envelopes and the bookkeeping that matches
//! inbound responses to outstanding requests. It performs no I/O; a transport
//! hands it inbound bytes and receives outbound bytes from it.

pub mod codec;
pub mod constants;
pub mod rpc;
pub mod utils;
