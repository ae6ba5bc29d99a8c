//! Template compile-and-cache layer.
//!
//! Translations containing `{{` are compiled once and cached by the
//! [`TemplateEngine`]. Rendering never fails: a template that does not
//! compile, or that cannot be executed against the supplied data, renders
//! as its raw text.

mod compiled;
mod parser;

use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc,
    LazyLock,
    PoisonError,
    RwLock,
};

pub use compiled::{
    FieldPath,
    Template,
    TemplateError,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// How compiled templates are keyed in the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKeying {
    /// Translation key plus a hash of the text.
    #[default]
    Content,
    /// Translation key only: the first text compiled under a key is reused
    /// for every later text with that key.
    Key,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Key(String),
    Content(String, blake3::Hash),
}

/// Compiles translation texts and caches the result.
pub struct TemplateEngine {
    keying: CacheKeying,
    cache: RwLock<HashMap<CacheKey, Arc<Template>>>,
}

static SHARED_CONTENT: LazyLock<Arc<TemplateEngine>> =
    LazyLock::new(|| Arc::new(TemplateEngine::new(CacheKeying::Content)));

static SHARED_KEY: LazyLock<Arc<TemplateEngine>> =
    LazyLock::new(|| Arc::new(TemplateEngine::new(CacheKeying::Key)));

impl TemplateEngine {
    #[must_use]
    pub fn new(keying: CacheKeying) -> Self {
        Self { keying, cache: RwLock::new(HashMap::new()) }
    }

    /// The process-wide engine for `keying`.
    #[must_use]
    pub fn shared(keying: CacheKeying) -> Arc<Self> {
        match keying {
            CacheKeying::Content => Arc::clone(&SHARED_CONTENT),
            CacheKeying::Key => Arc::clone(&SHARED_KEY),
        }
    }

    #[must_use]
    pub const fn keying(&self) -> CacheKeying {
        self.keying
    }

    /// Number of cached templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders `text`, the translation found for `key`, against lazily
    /// produced `data`.
    ///
    /// Text without `{{` is returned as is. Compile and execution failures
    /// return `text` unchanged.
    #[must_use]
    pub fn render<F>(&self, key: &str, text: &str, data: F) -> String
    where
        F: FnOnce() -> serde_json::Result<Value>,
    {
        if !text.contains("{{") {
            return text.to_string();
        }

        let Some(template) = self.compiled(key, text) else {
            return text.to_string();
        };

        let result = data().map_err(TemplateError::Data).and_then(|data| template.execute(&data));
        match result {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::debug!(key, error = %error, "Failed to execute translation template");
                text.to_string()
            }
        }
    }

    /// Returns the cached template for `(key, text)`, compiling it on a miss.
    fn compiled(&self, key: &str, text: &str) -> Option<Arc<Template>> {
        let cache_key = match self.keying {
            CacheKeying::Key => CacheKey::Key(key.to_string()),
            CacheKeying::Content => CacheKey::Content(key.to_string(), blake3::hash(text.as_bytes())),
        };

        if let Some(template) =
            self.cache.read().unwrap_or_else(PoisonError::into_inner).get(&cache_key)
        {
            tracing::trace!(key, "Template cache hit");
            return Some(Arc::clone(template));
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(template) = cache.get(&cache_key) {
            return Some(Arc::clone(template));
        }

        match Template::compile(text) {
            Ok(template) => {
                let template = Arc::new(template);
                cache.insert(cache_key, Arc::clone(&template));
                Some(template)
            }
            Err(error) => {
                tracing::warn!(key, error = %error, "Failed to compile translation template");
                None
            }
        }
    }
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("keying", &self.keying)
            .field("cached", &self.len())
            .finish()
    }
}
