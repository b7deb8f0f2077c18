//! Cover image and media URL resolution

use crate::types::BookRecord;

/// Bundled covers used when a book has no image of its own
pub const DEFAULT_FALLBACK_COVERS: [&str; 4] = [
    "/images/covers/classic-1.jpg",
    "/images/covers/classic-2.jpg",
    "/images/covers/classic-3.jpg",
    "/images/covers/classic-4.jpg",
];

/// Resolve a media path stored by the backend against `base_url`
///
/// Absolute `http(s)` URLs pass through, `/media/...` and `media/...` are joined onto the base,
/// and any other bare path is assumed to live under `/media/`.
pub fn media_url(base_url: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }

    let base = base_url.trim_end_matches('/');
    let url = if path.starts_with("/media/") {
        format!("{}{}", base, path)
    } else if path.starts_with("media/") {
        format!("{}/{}", base, path)
    } else {
        format!("{}/media/{}", base, path.trim_start_matches('/'))
    };
    Some(url)
}

/// Picks the cover shown for a book
#[derive(Debug, Clone)]
pub struct CoverResolver {
    base_url: String,
    fallbacks: Vec<String>,
}

impl CoverResolver {
    /// Resolver with the bundled fallback covers
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_fallbacks(
            base_url,
            DEFAULT_FALLBACK_COVERS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_fallbacks(base_url: impl Into<String>, fallbacks: Vec<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fallbacks,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Explicit cover URL, then the resolved cover path, then a fallback picked by id
    ///
    /// Returns `None` only when the book has no image and no fallbacks are configured.
    pub fn resolve(&self, book: &BookRecord) -> Option<String> {
        if let Some(url) = book
            .cover_image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
        {
            return Some(url.to_string());
        }

        if let Some(url) = book
            .cover_image
            .as_deref()
            .and_then(|path| media_url(&self.base_url, path))
        {
            return Some(url);
        }

        self.fallback_for(book.id).map(str::to_string)
    }

    /// Deterministic fallback for `id`, stable for negative ids too
    pub fn fallback_for(&self, id: i64) -> Option<&str> {
        if self.fallbacks.is_empty() {
            return None;
        }
        let index = id.rem_euclid(self.fallbacks.len() as i64) as usize;
        self.fallbacks.get(index).map(String::as_str)
    }
}
