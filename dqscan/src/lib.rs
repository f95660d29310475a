//! Library module for dqscan.
//!
//! Exposes the CLI definition, console rendering and report writing so they
//! can be tested. The binary entry point is in main.rs.

pub mod cli;
pub mod render;
pub mod report;
