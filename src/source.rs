use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::GenerationError;

/// Produces the prose for one topic.
pub trait ContentSource {
    fn resolve(&mut self, topic: &str) -> Result<String, GenerationError>;
}

impl<F> ContentSource for F
where
    F: FnMut(&str) -> Result<String, GenerationError>,
{
    fn resolve(&mut self, topic: &str) -> Result<String, GenerationError> {
        self(topic)
    }
}

/// Reads pre-generated responses from `<dir>/<slug>.txt`.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, topic: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", topic_slug(topic)))
    }
}

impl ContentSource for DirectorySource {
    fn resolve(&mut self, topic: &str) -> Result<String, GenerationError> {
        let path = self.path_for(topic);
        std::fs::read_to_string(&path)
            .map_err(|e| GenerationError::new(format!("{}: {}", path.display(), e)))
    }
}

/// Lowercase alphanumerics joined by single dashes ("Newton's Laws" -> "newton-s-laws").
pub fn topic_slug(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    for ch in topic.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Generated text per distinct topic string, resolved before pagination starts.
#[derive(Default)]
pub struct TopicResponses {
    responses: HashMap<String, String>,
}

impl TopicResponses {
    /// Resolve every distinct topic once. A failed topic gets `Error: {message}`
    /// as its body so the chapter still renders.
    pub fn resolve_all<S>(topics: &[String], source: &mut S) -> Self
    where
        S: ContentSource + ?Sized,
    {
        let mut responses = HashMap::new();
        for topic in topics {
            if responses.contains_key(topic) {
                log::debug!("Reusing response for duplicate topic {topic:?}");
                continue;
            }
            let t0 = std::time::Instant::now();
            let text = match source.resolve(topic) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Content generation failed for {topic:?}: {e}");
                    format!("Error: {e}")
                }
            };
            log::debug!(
                "Resolved {topic:?}: {} bytes in {:.1}ms",
                text.len(),
                t0.elapsed().as_secs_f64() * 1000.0,
            );
            responses.insert(topic.clone(), text);
        }
        Self { responses }
    }

    pub fn insert(&mut self, topic: impl Into<String>, text: impl Into<String>) {
        self.responses.insert(topic.into(), text.into());
    }

    /// Missing topics read as empty text.
    pub fn get(&self, topic: &str) -> &str {
        self.responses.get(topic).map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
