//! Read-only MCP bridge for the Taiga project-management API.
//!
//! The bridge authenticates against a Taiga instance once at startup and
//! exposes its read endpoints (projects, user stories, tasks, issues) as MCP
//! tools over stdio. Two layers carry the actual design weight:
//!
//! - [`filters`]: per-entity-kind filter tables that turn untrusted tool
//!   arguments into the exact query parameters Taiga accepts.
//! - [`taiga::resolve`]: resolution of UI-visible reference numbers (scoped
//!   per project) into the opaque IDs the upstream API addresses entities by.
//!
//! Everything else is a pass-through: upstream records are forwarded as raw
//! JSON, never re-shaped beyond attaching comment threads to single-entity
//! fetches.

pub mod config;
pub mod filters;
pub mod mcp;
pub mod taiga;
