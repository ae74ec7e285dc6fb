//! # kitchen-sakhi
//!
//! A small backend that asks a generative language model for Indian meal
//! ideas, keeps a history of what it generated, and turns plans into
//! printable PDFs.
//!
//! ## Operations
//!
//! ```text
//! POST /chat           ingredients ──▶ prompt ──▶ model ──▶ history ──▶ 3 dishes
//! POST /generate-plan  diet + region ──▶ prompt ──▶ model ──▶ history ──▶ weekly plan
//! POST /download-pdf   plan text ──▶ paginate ──▶ render ──▶ static/<uuid>.pdf
//! GET  /health         {"status": "ok"}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kitchen_sakhi::{serve, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider key read from GEMINI_API_KEY
//!     let config = ServiceConfig::builder()
//!         .mongo_uri("mongodb://localhost:27017/")
//!         .build()?;
//!     serve(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Layout Without a Server
//!
//! ```rust
//! use kitchen_sakhi::{paginate, PageGeometry};
//!
//! let text = (1..=39).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
//! let pages = paginate(&text, &PageGeometry::A4);
//! assert_eq!(pages.page_count(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `kitchen-sakhi` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod service;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::{ErrorBody, KitchenError};
pub use history::{
    ChatRecord, HistoryRecord, HistoryStore, MemoryHistoryStore, MongoHistoryStore, PlanRecord,
    RecordId,
};
pub use pipeline::llm::{LlmGateway, ModelGateway};
pub use pipeline::paginate::{paginate, LayoutLine, Page, PageGeometry, PageSequence};
pub use pipeline::render::{render_pdf, render_pdf_blocking};
pub use pipeline::sink::{LocalDirSink, OutputSink};
pub use server::{router, serve};
pub use service::KitchenService;
