use axum::extract::State;
use axum::Json;

use crate::llm::roadmap::{self, RoadmapOutcome};
use crate::models::{ErrorBody, QueryRequest, RoadmapReply, RoadmapResponse};
use crate::retrieval::NO_QUERY;
use crate::state::AppState;

const NO_OCCUPATION: &str = "Could not determine a role from the query.";

/// POST /get_roadmap - Three-phase learning roadmap for the role in the query.
/// Generation failures fall back to a fixed template, so this never errors.
pub async fn get_roadmap(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Json<RoadmapReply> {
    let retrieval = &state.config.retrieval;
    let outcome = roadmap::generate(
        state.summarizer.as_ref(),
        &req.query,
        &retrieval.platform_name,
        retrieval.llm_timeout(),
    )
    .await;

    Json(match outcome {
        RoadmapOutcome::EmptyQuery => RoadmapReply::Error(ErrorBody::new(NO_QUERY)),
        RoadmapOutcome::NoOccupation => RoadmapReply::Error(ErrorBody::new(NO_OCCUPATION)),
        RoadmapOutcome::Roadmap { title, text } => RoadmapReply::Roadmap(RoadmapResponse {
            roadmap_title: title,
            roadmap: text,
        }),
    })
}
