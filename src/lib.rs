//! # course-search
//!
//! A Rust web service that answers free-text questions about an online course
//! catalog and generates learning roadmaps, using a keyword pre-filter, exact
//! vector search, and a hosted LLM for best-effort summaries.
//!
//! ## Architecture
//!
//! The `/ask_course` pipeline:
//!
//! ```text
//!                      ┌──────────────┐
//!                      │  User Query  │
//!                      └──────┬───────┘
//!                             │ trim + lowercase
//!                             ▼
//!                   ┌───────────────────┐
//!                   │  Tokenize, drop   │
//!                   │    stopwords      │
//!                   └─────────┬─────────┘
//!                             │
//!              ┌──────────────┴──────────────┐
//!              │ only "course(s)"?           │ topic keywords
//!              ▼                             ▼
//!   ┌─────────────────────┐      ┌───────────────────────┐
//!   │ Whole catalog,      │      │ Tag substring filter  │
//!   │ lightweight view    │      │ (dedup by name)       │
//!   └─────────────────────┘      └───────────┬───────────┘
//!                                            │ candidates
//!                                            ▼
//!                                ┌───────────────────────┐
//!                                │ Ephemeral sub-index   │
//!                                │ exact L2, top k       │
//!                                └───────────┬───────────┘
//!                                            │
//!                                            ▼
//!                                ┌───────────────────────┐
//!                                │ Dedup, LLM summary    │
//!                                │ (fallback on failure) │
//!                                └───────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, catalog, LLM and retrieval
//! - [`error`] - `CourseError`: store, embedding and generation failures
//! - [`models`] - `CourseRecord`, response shapes and request/response types
//! - [`catalog::store`] - Course store trait, JSON file and in-memory stores, document normalization
//! - [`catalog::chunk`] - Canonical labeled text per course
//! - [`catalog`] - `CatalogService`: copy-on-reload snapshot of records, chunks and index
//! - [`search::keyword`] - Stopwords, tokenizer, tag filter
//! - [`search::vector`] - Flat Euclidean index with ephemeral subsets
//! - [`search::dedup`] - Order-preserving dedup by course name
//! - [`llm::client`] - Shared HTTP client for Ollama and OpenAI-compatible hosts
//! - [`llm::chat`] - One-shot chat completion
//! - [`llm::embeddings`] - Batch embeddings via Ollama or OpenAI-compatible APIs
//! - [`llm::summarize`] - Best-effort summarization with timeout and fallback
//! - [`llm::roadmap`] - Occupation extraction and three-phase roadmap generation
//! - [`retrieval`] - The orchestrator tying the above together
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod retrieval;
pub mod search;
pub mod state;
