//! Retrieval orchestrator: keyword filter, vector re-rank, dedup, summary.

use futures_util::future::join_all;
use std::sync::Arc;

use crate::catalog::CatalogService;
use crate::config::RetrievalConfig;
use crate::error::CourseError;
use crate::llm::embeddings::{encode_one, Encoder};
use crate::llm::summarize::{best_effort, Summarizer};
use crate::models::{CourseRecord, CourseView, ResponseShape};
use crate::search::dedup::dedup_by_name;
use crate::search::keyword::{filter_positions, KeywordSet, StopwordSet, Tokenizer};

pub const NO_QUERY: &str = "No query provided.";
pub const NO_MATCHES: &str = "No courses found matching your query.";
pub const SUMMARY_FALLBACK: &str = "Here are some top course recommendations based on your query.";
pub const CATALOG_SUMMARY: &str = "Here are all the courses currently available on the platform.";

const DESCRIPTION_INSTRUCTION: &str =
    "Summarize the following course description in 2 lines max:";
const BENEFITS_INSTRUCTION: &str = "Summarize the following course benefits in 2 lines max:";
const PREREQUISITES_INSTRUCTION: &str = "Summarize the prerequisites below briefly:";

#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// Blank query
    EmptyQuery,
    /// Nothing in the catalog matched
    NoMatches,
    Courses {
        summary: String,
        shape: ResponseShape,
        courses: Vec<CourseView>,
    },
}

pub struct Retriever {
    catalog: Arc<CatalogService>,
    encoder: Arc<dyn Encoder>,
    summarizer: Arc<dyn Summarizer>,
    tokenizer: Tokenizer,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        catalog: Arc<CatalogService>,
        encoder: Arc<dyn Encoder>,
        summarizer: Arc<dyn Summarizer>,
        config: RetrievalConfig,
    ) -> Self {
        let tokenizer = Tokenizer::new(StopwordSet::with_extra(&config.extra_stopwords));
        Self {
            catalog,
            encoder,
            summarizer,
            tokenizer,
            config,
        }
    }

    /// Answer a free-text question about the catalog.
    ///
    /// An unloaded catalog or an embedding failure is an error; summaries always
    /// fall back to fixed text.
    pub async fn ask(&self, query: &str) -> Result<AskOutcome, CourseError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(AskOutcome::EmptyQuery);
        }

        let keywords = self.tokenizer.tokenize(&query);
        let snapshot = self.catalog.loaded().await?;
        let records = snapshot.records();

        if keywords.is_list_everything() {
            if records.is_empty() {
                return Ok(AskOutcome::NoMatches);
            }
            tracing::info!("Query '{query}' lists the whole catalog ({} courses)", records.len());
            return Ok(AskOutcome::Courses {
                summary: CATALOG_SUMMARY.to_string(),
                shape: ResponseShape::Lightweight,
                courses: records
                    .iter()
                    .map(|r| ResponseShape::Lightweight.view(r))
                    .collect(),
            });
        }

        // Phase 1: coarse tag filter
        let topical = keywords.topical();
        let positions = filter_positions(records, &topical);
        if positions.is_empty() {
            tracing::info!("Query '{query}' matched no tags (keywords: {})", topical.join(", "));
            return Ok(AskOutcome::NoMatches);
        }

        // Phase 2: exact vector ranking over the filtered subset only
        let k = self.config.top_k.max(1).min(positions.len());
        let query_vector = tokio::time::timeout(
            self.config.embed_timeout(),
            encode_one(self.encoder.as_ref(), &query),
        )
        .await
        .map_err(|_| CourseError::embedding("query embedding timed out"))??;

        let sub_index = snapshot.index().subset(&positions);
        let neighbors = sub_index.search(&query_vector, k)?;
        let ranked: Vec<&CourseRecord> = neighbors
            .iter()
            .filter_map(|n| positions.get(n.position).map(|&p| &records[p]))
            .collect();
        let ranked = dedup_by_name(ranked, |r| r.name.as_str());

        tracing::info!(
            "Query '{query}': {} candidate(s), returning {}",
            positions.len(),
            ranked.len()
        );

        let summary_prompt = summary_prompt(&topical, &ranked);
        let (summary, courses) = tokio::join!(
            best_effort(
                self.summarizer.as_ref(),
                &summary_prompt,
                self.config.llm_timeout(),
                SUMMARY_FALLBACK,
            ),
            join_all(ranked.iter().map(|r| self.detail(r))),
        );

        Ok(AskOutcome::Courses {
            summary,
            shape: ResponseShape::Full,
            courses,
        })
    }

    /// Full view of a course, long fields condensed when enabled.
    async fn detail(&self, record: &CourseRecord) -> CourseView {
        let mut view = ResponseShape::Full.view(record);
        if !self.config.summarize_fields {
            return view;
        }

        if let CourseView::Detail(detail) = &mut view {
            let (description, benefits, prerequisites) = tokio::join!(
                self.condense(&record.description, DESCRIPTION_INSTRUCTION),
                self.condense(&record.benefits, BENEFITS_INSTRUCTION),
                self.condense(&record.prerequisites, PREREQUISITES_INSTRUCTION),
            );
            detail.description = description;
            detail.benefits = benefits;
            detail.prerequisites = prerequisites;
        }
        view
    }

    /// Shorten `text` via the summarizer, keeping the original on any failure.
    async fn condense(&self, text: &str, instruction: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let prompt = format!("{instruction}\n\n{text}");
        best_effort(
            self.summarizer.as_ref(),
            &prompt,
            self.config.llm_timeout(),
            text,
        )
        .await
    }
}

fn summary_prompt(keywords: &KeywordSet, courses: &[&CourseRecord]) -> String {
    let terms = keywords.join(", ");
    let listing = courses
        .iter()
        .map(|c| format!("{}: {}", c.name, c.benefits))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "A learner searched our course catalog for: {terms}.\n\
         Based on the following list of course names and benefits, write a short summary \
         (1-2 sentences) of what the learner might gain. Mention the search terms ({terms}) \
         explicitly.\n\n{listing}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_mentions_terms_and_courses() {
        let rust = CourseRecord {
            name: "Rust 101".into(),
            benefits: "Fearless concurrency".into(),
            ..CourseRecord::default()
        };
        let prompt = summary_prompt(&KeywordSet::from_words(["rust", "systems"]), &[&rust]);
        assert!(prompt.contains("rust, systems"));
        assert!(prompt.contains("Rust 101: Fearless concurrency"));
        assert!(prompt.contains("1-2 sentences"));
    }
}
