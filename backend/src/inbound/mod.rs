//! Inbound adapters that translate external requests into domain calls
//! while keeping framework details at the edge.
//!
//! The command-line driver lives under [`cli`].

pub mod cli;
