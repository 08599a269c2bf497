//! MergeLens — pre-merge branch comparison over MCP.
//!
//! Exposes git branch/diff/commit statistics as MCP tools so an AI
//! assistant can inspect pending changes before a merge. All git access is
//! read-only.

pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod mcp;
pub mod observability;
