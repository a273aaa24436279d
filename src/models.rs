use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One course, flattened from whatever document shape the store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub price: Price,
    pub estimated_price: Price,
    pub thumbnail: String,
    /// Comma-joined tag list (", ")
    pub tags: String,
    /// Pipe-joined benefit titles (" | ")
    pub benefits: String,
    /// Pipe-joined prerequisite titles (" | ")
    pub prerequisites: String,
    pub lessons: LessonSummary,
}

/// Per-lesson fields, each pipe-joined in lesson order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonSummary {
    pub titles: String,
    pub sections: String,
    pub lengths: String,
    /// Links of one lesson are joined with " & ", lessons with " | "
    pub links: String,
}

/// Course prices arrive either as numbers or as free text ("Free", "$49").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Default for Price {
    fn default() -> Self {
        Price::Number(0.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Price::Number(n) => write!(f, "{n}"),
            Price::Text(s) => f.write_str(s),
        }
    }
}

/// Which fields of a course a response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// name, price, level, thumbnail; used when listing the whole catalog
    Lightweight,
    /// name, description, price, level, benefits, prerequisites; used for ranked results
    Full,
}

impl ResponseShape {
    pub fn view(self, record: &CourseRecord) -> CourseView {
        match self {
            ResponseShape::Lightweight => CourseView::Summary(CourseSummary {
                name: record.name.clone(),
                price: record.price.to_string(),
                level: record.level.clone(),
                thumbnail: record.thumbnail.clone(),
            }),
            ResponseShape::Full => CourseView::Detail(CourseDetail {
                name: record.name.clone(),
                description: record.description.clone(),
                price: record.price.to_string(),
                level: record.level.clone(),
                benefits: record.benefits.clone(),
                prerequisites: record.prerequisites.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub name: String,
    pub price: String,
    pub level: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
    pub name: String,
    pub description: String,
    pub price: String,
    pub level: String,
    pub benefits: String,
    pub prerequisites: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CourseView {
    Summary(CourseSummary),
    Detail(CourseDetail),
}

impl CourseView {
    pub fn name(&self) -> &str {
        match self {
            CourseView::Summary(s) => &s.name,
            CourseView::Detail(d) => &d.name,
        }
    }
}

/// Body of `/ask_course` and `/get_roadmap`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskResponse {
    pub summary: String,
    pub courses: Vec<CourseView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapResponse {
    pub roadmap_title: String,
    pub roadmap: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Outcome of inserting raw course documents into a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Reply of `/ask_course`: either an answer or a user-facing error message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AskReply {
    Answer(AskResponse),
    Error(ErrorBody),
}

/// Reply of `/get_roadmap`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoadmapReply {
    Roadmap(RoadmapResponse),
    Error(ErrorBody),
}

/// Catalog status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStatus {
    pub courses: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Import response: insert counts plus the catalog size after reload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResponse {
    pub inserted: usize,
    pub skipped: usize,
    pub courses: usize,
}
