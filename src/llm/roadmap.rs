//! Learning roadmap generation for a role named in a free-text query.

use std::time::Duration;

use crate::llm::summarize::{self, Summarizer};

/// Words that frame a roadmap request without naming the role itself.
const ROADMAP_FILLER: &[&str] = &[
    "a", "an", "the", "to", "for", "of", "as", "in", "on", "is", "be", "become", "becoming",
    "how", "do", "does", "get", "into", "start", "i", "me", "my", "want", "wanna", "would",
    "like", "can", "you", "what", "please", "give", "show", "create", "generate", "make",
    "need", "roadmap", "road", "map", "career", "path", "plan", "guide", "learning", "step",
    "steps",
];

const PHASES: [&str; 3] = ["Phase 1", "Phase 2", "Phase 3"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadmapOutcome {
    EmptyQuery,
    NoOccupation,
    Roadmap { title: String, text: String },
}

/// Pull the role out of a roadmap request: "python developer roadmap" → "python developer".
pub fn extract_occupation(query: &str) -> Option<String> {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|w| !w.is_empty() && !ROADMAP_FILLER.contains(w))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

pub fn roadmap_title(occupation: &str) -> String {
    let words: Vec<String> = occupation
        .split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    format!("{} Roadmap", words.join(" "))
}

fn roadmap_prompt(occupation: &str, platform: &str) -> String {
    format!(
        "Create a learning roadmap for someone who wants to become a {occupation}.\n\
         Structure it in exactly three phases, each starting on its own line with \
         \"Phase 1:\", \"Phase 2:\" and \"Phase 3:\" followed by a short phase name.\n\
         Under each phase list the key skills, tools and topics, one per line starting \
         with a hyphen, plus a rough duration.\n\
         Write plain text only: no Markdown, no asterisks, no hash headings, no code blocks.\n\
         Finish with one sentence recommending {platform} as the platform to take courses \
         for each phase."
    )
}

/// Drop Markdown emphasis, headings and fences from generated text.
pub fn strip_markdown(text: &str) -> String {
    let mut lines = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            continue;
        }
        let mut cleaned = trimmed
            .trim_start_matches('#')
            .trim_start()
            .replace("**", "")
            .replace("__", "")
            .replace('`', "");
        if let Some(rest) = cleaned.strip_prefix("* ") {
            cleaned = format!("- {rest}");
        }
        lines.push(cleaned);
    }
    lines.join("\n").trim().to_string()
}

fn has_all_phases(text: &str) -> bool {
    PHASES.iter().all(|p| text.contains(p))
}

fn ensure_platform(mut text: String, platform: &str) -> String {
    if !text.to_lowercase().contains(&platform.to_lowercase()) {
        text.push_str(&format!(
            "\n\nRecommended platform: {platform} offers courses for every phase of this roadmap."
        ));
    }
    text
}

/// Deterministic roadmap used when generation fails or comes back malformed.
pub fn fallback_roadmap(occupation: &str, platform: &str) -> String {
    format!(
        "Phase 1: Foundations (1-2 months)\n\
         - Core concepts and vocabulary of a {occupation}\n\
         - Essential tools and a working setup\n\
         - Small guided exercises to build confidence\n\
         \n\
         Phase 2: Core Skills (2-4 months)\n\
         - The main techniques a {occupation} uses every day\n\
         - Two or three hands-on projects of growing scope\n\
         - Reading and learning from real-world examples\n\
         \n\
         Phase 3: Advanced Practice (3-6 months)\n\
         - Specialised topics and best practices\n\
         - A portfolio project that shows end-to-end ability\n\
         - Interview preparation and community involvement\n\
         \n\
         Recommended platform: {platform} offers courses for every phase of this roadmap."
    )
}

/// Generate a three-phase, plain-text roadmap for the role named in `query`.
pub async fn generate(
    summarizer: &dyn Summarizer,
    query: &str,
    platform: &str,
    timeout: Duration,
) -> RoadmapOutcome {
    let query = query.trim();
    if query.is_empty() {
        return RoadmapOutcome::EmptyQuery;
    }
    let Some(occupation) = extract_occupation(query) else {
        return RoadmapOutcome::NoOccupation;
    };

    let prompt = roadmap_prompt(&occupation, platform);
    let text = match summarize::attempt(summarizer, &prompt, timeout).await {
        Some(raw) => {
            let cleaned = strip_markdown(&raw);
            if has_all_phases(&cleaned) {
                ensure_platform(cleaned, platform)
            } else {
                tracing::warn!("Roadmap for '{occupation}' lacked three phases, using template");
                fallback_roadmap(&occupation, platform)
            }
        }
        None => fallback_roadmap(&occupation, platform),
    };

    tracing::info!("Generated roadmap for '{occupation}'");
    RoadmapOutcome::Roadmap {
        title: roadmap_title(&occupation),
        text,
    }
}
