//! Workflow core for the plant inspection client.
//!
//! The binary drives one inspection detail session per invocation: load the
//! inspection and its steps from the remote service, apply the requested
//! mutation, report the outcome. The modules mirror that split: [`store`]
//! owns the in-memory session state, [`transition`] the lifecycle state
//! machine, [`editor`] the gated step mutations, and [`report`] the
//! read-only summary and printable rendering.

pub mod api;
pub mod cli;
pub mod editor;
pub mod report;
pub mod schema;
pub mod session;
pub mod store;
pub mod transition;
pub mod workflow;
