use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the course catalog file lives
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Explicit catalog file path; defaults to `<data_dir>/courses.json`
    pub catalog_path: Option<PathBuf>,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Retrieval pipeline tuning
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for summaries and roadmaps
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Embedding vector dimension
    pub embedding_dim: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of courses returned by the filtered path (at least 1)
    pub top_k: usize,
    /// Upper bound on a single embedding call
    pub embed_timeout_secs: u64,
    /// Upper bound on a single summarization call
    pub llm_timeout_secs: u64,
    /// Summarize description, benefits and prerequisites of each returned course
    pub summarize_fields: bool,
    /// Added on top of the built-in stopword list
    pub extra_stopwords: Vec<String>,
    /// Platform the generated roadmaps point learners to
    pub platform_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:8000".to_string(),
            catalog_path: None,
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2".to_string(),
            embedding_model: "all-minilm".to_string(),
            api_key: None,
            embedding_dim: 384,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            embed_timeout_secs: 30,
            llm_timeout_secs: 20,
            summarize_fields: true,
            extra_stopwords: Vec::new(),
            platform_name: "NexGenie".to_string(),
        }
    }
}

impl RetrievalConfig {
    pub fn embed_timeout(&self) -> Duration {
        Duration::from_secs(self.embed_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("COURSE_SEARCH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("COURSE_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(path) = std::env::var("COURSE_SEARCH_CATALOG_PATH") {
            config.catalog_path = Some(PathBuf::from(path));
        }

        // LLM config
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("LLM_EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                config.llm.embedding_dim = d;
            }
        }

        // Retrieval config
        if let Ok(val) = std::env::var("COURSE_SEARCH_TOP_K") {
            if let Ok(v) = val.parse::<usize>() {
                config.retrieval.top_k = v.max(1);
            }
        }
        if let Ok(val) = std::env::var("COURSE_SEARCH_EMBED_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.retrieval.embed_timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("COURSE_SEARCH_LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.retrieval.llm_timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("COURSE_SEARCH_SUMMARIZE_FIELDS") {
            if let Ok(v) = val.parse() {
                config.retrieval.summarize_fields = v;
            }
        }
        if let Ok(val) = std::env::var("COURSE_SEARCH_EXTRA_STOPWORDS") {
            config.retrieval.extra_stopwords = parse_word_list(&val);
        }
        if let Ok(name) = std::env::var("COURSE_SEARCH_PLATFORM_NAME") {
            config.retrieval.platform_name = name;
        }

        config
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("courses.json"))
    }
}

fn parse_word_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
