//! # vellum-core
//!
//! Core document intelligence for Vellum vaults.
//!
//! This crate defines the foundational pieces used across all other
//! Vellum crates:
//! - [`Document`] — a markdown file as an ordered sequence of lines
//! - [`Heading`] — `(level, title, line_index)` derived from `#` lines
//! - [`anchor`] — the deterministic heading-anchor slug function
//! - Section extraction ([`extract_section`], [`excerpt_under_heading`])
//! - Task grammar ([`Task`], [`extract_tasks`]) and the progress
//!   [`StatusIndex`]
//! - Error hierarchy ([`VellumError`], [`Result`])
//!
//! Everything here is pure text-in/data-out: no filesystem access, no
//! shared state. Callers re-read vault files per operation and pass the
//! content in.

pub mod anchor;
pub mod document;
pub mod error;
pub mod section;
pub mod task;

pub use anchor::anchor;
pub use document::{nearest_heading_title, parse_heading_line, scan_headings, Document, Heading};
pub use error::{Result, VellumError};
pub use section::{excerpt_below, excerpt_under_heading, extract_section};
pub use task::{extract_tasks, is_task_line, parse_task_line, StatusIndex, Task, STALE_AFTER_DAYS};
