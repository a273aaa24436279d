//! Canonical text rendering of a course, the unit that gets embedded.

use crate::models::CourseRecord;

/// Text projection of one [`CourseRecord`]. Regenerated on every catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
}

impl Chunk {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Render a record as labeled lines in a fixed order.
///
/// Every field listed here is visible to vector search. Lesson data is left out.
pub fn format(record: &CourseRecord) -> Chunk {
    let text = format!(
        "Course: {}\n\
         Description: {}\n\
         Tags: {}\n\
         Category: {}\n\
         Level: {}\n\
         Price: {}\n\
         Benefits: {}\n\
         Prerequisites: {}",
        record.name,
        record.description,
        record.tags,
        record.category,
        record.level,
        record.price,
        record.benefits,
        record.prerequisites,
    );
    Chunk { text }
}

/// Render every record, keeping catalog order so position `i` matches record `i`.
pub fn format_all(records: &[CourseRecord]) -> Vec<Chunk> {
    records.iter().map(format).collect()
}
