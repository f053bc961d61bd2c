//! Pattern cache for regex bounds (`=~`, `!~`) and `matchN` (spec.md §5).
//!
//! Keyed by pattern string; values are immutable once inserted, so lookups
//! after the first compile are pure reads — matching the single-threaded
//! cooperative model of spec.md §5.

use std::collections::HashMap;

use regex::Regex;

#[derive(Debug, Default)]
pub struct RegexCache {
    compiled: HashMap<String, Regex>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile (or fetch) the regex for `pattern`. Errors are the caller's
    /// responsibility to turn into an `EvalError` Bottom.
    pub fn get_or_compile(&mut self, pattern: &str) -> Result<&Regex, regex::Error> {
        if !self.compiled.contains_key(pattern) {
            let re = Regex::new(pattern)?;
            self.compiled.insert(pattern.to_string(), re);
        }
        Ok(self.compiled.get(pattern).expect("just inserted"))
    }
}

#[cfg(test)]
mod regex_cache_tests {
    use super::*;

    #[test]
    fn caches_compiled_pattern() {
        let mut cache = RegexCache::new();
        assert!(cache.get_or_compile("^a+$").is_ok());
        assert!(cache.get_or_compile("^a+$").unwrap().is_match("aaa"));
    }

    #[test]
    fn invalid_pattern_errors() {
        let mut cache = RegexCache::new();
        assert!(cache.get_or_compile("(unterminated").is_err());
    }
}
