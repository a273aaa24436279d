use axum::extract::State;
use axum::Json;

use crate::api::{failure, ApiError};
use crate::models::{AskReply, AskResponse, ErrorBody, QueryRequest};
use crate::retrieval::{AskOutcome, NO_MATCHES, NO_QUERY};
use crate::state::AppState;

/// POST /ask_course - Answer a free-text question about the catalog:
///   1. "courses" alone lists the whole catalog (lightweight view)
///   2. otherwise tag filter → vector rank → dedup → LLM summary (full view)
pub async fn ask_course(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<AskReply>, ApiError> {
    let outcome = state.retriever.ask(&req.query).await.map_err(failure)?;

    let reply = match outcome {
        AskOutcome::EmptyQuery => AskReply::Error(ErrorBody::new(NO_QUERY)),
        AskOutcome::NoMatches => AskReply::Answer(AskResponse {
            summary: NO_MATCHES.to_string(),
            courses: Vec::new(),
        }),
        AskOutcome::Courses {
            summary, courses, ..
        } => AskReply::Answer(AskResponse { summary, courses }),
    };

    Ok(Json(reply))
}
