//! Operator CLI for the affiliate review site: seeds and inspects the content
//! store directly, or pushes webhook payloads to a running server.

pub mod cli;
pub mod commands;
pub mod payload;
