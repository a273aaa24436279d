//! Record Store Adapter: reads raw course documents and flattens them into
//! [`CourseRecord`]s.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::CourseError;
use crate::models::{CourseRecord, InsertReport, LessonSummary, Price};

const TAG_SEPARATOR: &str = ", ";
const ITEM_SEPARATOR: &str = " | ";
const LINK_SEPARATOR: &str = " & ";

/// Source of course records.
///
/// An empty result means "no courses", never an error.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Fetch every course, normalized, in store order.
    async fn fetch_all(&self) -> Result<Vec<CourseRecord>, CourseError>;

    /// Insert raw documents, skipping any whose name is already present.
    async fn insert(&self, documents: Vec<Value>) -> Result<InsertReport, CourseError>;
}

/// Flatten one heterogeneous course document.
///
/// Keys are matched case-insensitively; missing fields become "" or 0.
pub fn normalize_document(doc: &Value) -> CourseRecord {
    let fields = lowercase_keys(doc);
    let lessons = array(&fields, "coursedata");

    CourseRecord {
        name: text(fields.get("name")),
        description: text(fields.get("description")),
        category: text(fields.get("categories").or_else(|| fields.get("category"))),
        level: text(fields.get("level")),
        price: price(fields.get("price")),
        estimated_price: price(fields.get("estimatedprice")),
        thumbnail: match fields.get("thumbnail") {
            Some(Value::Object(thumb)) => text(thumb.get("url")),
            _ => String::new(),
        },
        tags: match fields.get("tags") {
            Some(Value::Array(tags)) => join(tags.iter().map(|t| text(Some(t))), TAG_SEPARATOR),
            other => text(other),
        },
        benefits: join(array(&fields, "benefits").iter().map(titled), ITEM_SEPARATOR),
        prerequisites: join(array(&fields, "prerequisites").iter().map(titled), ITEM_SEPARATOR),
        lessons: LessonSummary {
            titles: join(lessons.iter().map(|l| field(l, "title")), ITEM_SEPARATOR),
            sections: join(lessons.iter().map(|l| field(l, "videosection")), ITEM_SEPARATOR),
            lengths: join(
                lessons.iter().map(|l| match lookup(l, "videolength") {
                    Some(v) if !v.is_null() => price(Some(v)).to_string(),
                    _ => "0".to_string(),
                }),
                ITEM_SEPARATOR,
            ),
            links: join(
                lessons.iter().map(|l| match lookup(l, "links") {
                    Some(Value::Array(links)) => {
                        join(links.iter().map(|link| field(link, "url")), LINK_SEPARATOR)
                    }
                    _ => String::new(),
                }),
                ITEM_SEPARATOR,
            ),
        },
    }
}

fn lowercase_keys(doc: &Value) -> Map<String, Value> {
    match doc {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect(),
        _ => Map::new(),
    }
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn array<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match fields.get(key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

fn field(value: &Value, key: &str) -> String {
    text(lookup(value, key))
}

/// List items are either `{"title": ..}` objects or bare strings.
fn titled(item: &Value) -> String {
    match item {
        Value::Object(_) => field(item, "title"),
        other => text(Some(other)),
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn price(value: Option<&Value>) -> Price {
    match value {
        Some(Value::Number(n)) => Price::Number(n.as_f64().unwrap_or_default()),
        Some(Value::String(s)) => Price::Text(s.clone()),
        _ => Price::default(),
    }
}

fn join(parts: impl Iterator<Item = String>, separator: &str) -> String {
    parts.collect::<Vec<_>>().join(separator)
}

fn document_name(doc: &Value) -> String {
    text(lookup(doc, "name"))
}

/// Append `incoming` to `existing`, skipping names already seen.
fn merge_documents(existing: &mut Vec<Value>, incoming: Vec<Value>) -> InsertReport {
    let mut names: HashSet<String> = existing.iter().map(document_name).collect();
    let mut report = InsertReport::default();

    for doc in incoming {
        if names.insert(document_name(&doc)) {
            existing.push(doc);
            report.inserted += 1;
        } else {
            report.skipped += 1;
        }
    }

    report
}

// ─── JSON file ───────────────────────────────────────────

/// Course documents stored as a JSON array on disk.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_documents(&self) -> Result<Vec<Value>, CourseError> {
        let data = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CourseError::store(format!("cannot read {}: {e}", self.path.display()))
        })?;
        parse_documents(&data)
            .map_err(|e| CourseError::store(format!("malformed {}: {e}", self.path.display())))
    }

    /// Atomic write via temp file + rename.
    async fn write_documents(&self, docs: &[Value]) -> Result<(), CourseError> {
        let data = serde_json::to_string_pretty(docs).map_err(CourseError::store)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(CourseError::store)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data)
            .await
            .map_err(CourseError::store)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(CourseError::store)?;
        Ok(())
    }
}

/// A file may hold a single document or an array of them.
fn parse_documents(data: &str) -> serde_json::Result<Vec<Value>> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(match serde_json::from_str::<Value>(data)? {
        Value::Array(docs) => docs,
        single => vec![single],
    })
}

#[async_trait]
impl CourseStore for JsonFileStore {
    async fn fetch_all(&self) -> Result<Vec<CourseRecord>, CourseError> {
        let docs = self.read_documents().await?;
        Ok(docs.iter().map(normalize_document).collect())
    }

    async fn insert(&self, documents: Vec<Value>) -> Result<InsertReport, CourseError> {
        let _guard = self.write_lock.lock().await;

        let exists = tokio::fs::try_exists(&self.path).await.map_err(|e| {
            CourseError::store(format!("cannot stat {}: {e}", self.path.display()))
        })?;
        let mut docs = if exists {
            self.read_documents().await?
        } else {
            Vec::new()
        };

        let report = merge_documents(&mut docs, documents);
        if report.inserted > 0 {
            self.write_documents(&docs).await?;
        }
        tracing::info!(
            "Inserted {} course(s), skipped {} duplicate(s) in {}",
            report.inserted,
            report.skipped,
            self.path.display()
        );
        Ok(report)
    }
}

// ─── In-memory ───────────────────────────────────────────

/// Process-local store, handy for tests and for embedding the service.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Value>>,
}

impl MemoryStore {
    pub fn new(docs: Vec<Value>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<CourseRecord>, CourseError> {
        Ok(self.docs.read().iter().map(normalize_document).collect())
    }

    async fn insert(&self, documents: Vec<Value>) -> Result<InsertReport, CourseError> {
        let mut docs = self.docs.write();
        Ok(merge_documents(&mut docs, documents))
    }
}
