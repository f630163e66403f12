//! Anchor slugs for documented symbols.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;

/// Everything that is not a letter, mark, number, connector, space or hyphen.
static STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}\p{Pc} -]").expect("valid slug pattern"));

/// GitHub-style slugger.
///
/// Stateful: every call records the slug it handed out, and a later input
/// that normalizes to an already-issued slug gets a `-N` suffix.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next unique slug for `value`.
    pub fn slug(&mut self, value: &str) -> String {
        let original = normalize(value);
        let mut result = original.clone();

        while self.occurrences.contains_key(&result) {
            let count = self.occurrences.entry(original.clone()).or_insert(0);
            *count += 1;
            result = format!("{}-{}", original, count);
        }

        self.occurrences.insert(result.clone(), 0);
        result
    }
}

/// Lowercase, strip punctuation, turn spaces into hyphens.
fn normalize(value: &str) -> String {
    STRIP.replace_all(&value.to_lowercase(), "").replace(' ', "-")
}

#[derive(Debug, Default)]
struct RegistryState {
    slugger: Slugger,
    slugs: HashMap<String, String>,
}

/// Memoized `name -> slug` mapping for one render.
///
/// The slugger runs at most once per distinct name, so asking for the same
/// name twice returns the same slug instead of a suffixed one.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    state: Mutex<RegistryState>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `name`, computed on first use.
    pub fn slug(&self, name: &str) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(slug) = state.slugs.get(name) {
            return slug.clone();
        }

        let slug = state.slugger.slug(name);
        state.slugs.insert(name.to_string(), slug.clone());
        slug
    }

    /// Number of distinct names seen so far.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .slugs
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
