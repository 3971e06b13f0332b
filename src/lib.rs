//! ShortForge consultancy API library.
//!
//! Business intelligence lookup over pre-scraped company data, marketing
//! pitch generation (OpenAI with a deterministic fallback) and the
//! consultancy back office (inquiries, projects).
//!
//! # Modules
//!
//! - `api`: HTTP-facing handlers.
//! - `core`: Extraction, assembly and pitch logic plus shared models.
//! - `integrations`: Postgres record store and the OpenAI client.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Inquiry and project storage.
//! - `errors`: Error handling types.
//! - `extraction`: Per-field signal extractors.
//! - `handlers`: Business intelligence and pitch handlers, admin auth.
//! - `inquiry_handler` / `project_handler`: Back-office handlers.
//! - `intelligence`: Business intelligence assembler, profile and search.
//! - `llm_client`: OpenAI-compatible chat completions client.
//! - `pitch`: Pitch generator strategies and the fallback-wrapping service.
//! - `record_store`: Read access to enrichment rows and scraped pages.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod extraction;
pub mod handlers;
pub mod inquiry_handler;
pub mod inquiry_models;
pub mod intelligence;
pub mod llm_client;
pub mod models;
pub mod pitch;
pub mod project_handler;
pub mod project_models;
pub mod record_store;
