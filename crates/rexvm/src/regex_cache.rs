// Bounded most-recently-used cache of compiled regexes.

use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::regex::Regex;
use crate::regex_error::RegexResult;
use crate::regex_limits::DEFAULT_CACHE_CAPACITY;
use crate::regex_options::{RegexConfig, RegexOptions};

type CacheKey = (String, RegexOptions);

struct CacheInner {
    /// Most recently used first.
    entries: Vec<(CacheKey, Arc<Regex>)>,
    capacity: usize,
}

impl CacheInner {
    /// Moves a hit to the front.
    fn touch(&mut self, pattern: &str, options: RegexOptions) -> Option<Arc<Regex>> {
        let pos = self
            .entries
            .iter()
            .position(|((p, o), _)| p == pattern && *o == options)?;
        let entry = self.entries.remove(pos);
        let regex = Arc::clone(&entry.1);
        self.entries.insert(0, entry);
        Some(regex)
    }
}

/// Caches regexes by (pattern, options), evicting the least recently used
/// entry past capacity.
///
/// Compilation happens outside the lock, so two threads asking for the
/// same new pattern may both compile it; the first insert wins.
pub struct RegexCache {
    inner: Mutex<CacheInner>,
    /// Timeout and pool settings for regexes the cache compiles.
    config: RegexConfig,
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl RegexCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_config(capacity, RegexConfig::default())
    }

    pub fn with_config(capacity: usize, config: RegexConfig) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: Vec::with_capacity(capacity),
                capacity,
            }),
            config,
        }
    }

    pub fn get_or_compile(&self, pattern: &str, options: RegexOptions) -> RegexResult<Arc<Regex>> {
        if let Some(regex) = self.inner.lock().touch(pattern, options) {
            return Ok(regex);
        }

        let config = RegexConfig {
            options,
            ..self.config.clone()
        };
        let regex = Arc::new(Regex::with_config(pattern, &config)?);

        let mut inner = self.inner.lock();
        if let Some(existing) = inner.touch(pattern, options) {
            return Ok(existing);
        }
        if inner.capacity == 0 {
            return Ok(regex);
        }
        inner
            .entries
            .insert(0, ((pattern.to_string(), options), Arc::clone(&regex)));
        if inner.entries.len() > inner.capacity
            && let Some(((evicted, _), _)) = inner.entries.pop()
        {
            debug!("regex cache evicting {:?}", evicted);
        }
        Ok(regex)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Changes the capacity, evicting least recently used entries as needed.
    pub fn set_capacity(&self, capacity: usize) {
        let mut inner = self.inner.lock();
        inner.capacity = capacity;
        inner.entries.truncate(capacity);
    }
}
