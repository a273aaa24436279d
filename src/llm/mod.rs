//! Hosted model plumbing: embeddings, one-shot chat, summaries and roadmaps.

pub mod chat;
pub mod client;
pub mod embeddings;
pub mod roadmap;
pub mod summarize;
