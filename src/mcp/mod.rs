//! MCP server — Model Context Protocol implementation over stdio.
//!
//! - [`server`] — tool catalog, parameter structs, dispatch
//! - [`tools_git`] — handler logic for the 3 merge-review tools
//! - [`registry`] — catalog order and names

pub mod registry;
pub mod server;
pub mod tools_git;
