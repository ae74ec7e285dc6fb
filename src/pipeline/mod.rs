//! Pipeline stages behind the service operations.
//!
//! Each submodule implements exactly one step, so each can be tested alone
//! and swapped (another model vendor, another storage backend) without
//! touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! generation:  prompt ──▶ llm ──▶ (history)
//! export:      paginate ──▶ render ──▶ sink
//!              (layout)     (lopdf)    (disk / URL)
//! ```
//!
//! 1. [`llm`]: the only stage with model network I/O
//! 2. [`paginate`]: pure line-by-line layout with overflow page breaks
//! 3. [`render`]: PDF serialisation; runs in `spawn_blocking`
//! 4. [`sink`]: persists the bytes and returns a URL

pub mod llm;
pub mod paginate;
pub mod render;
pub mod sink;
