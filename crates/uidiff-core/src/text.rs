use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;

/// Order-insensitive similarity: characters shared as a multiset divided by the longer
/// length. A cheap stand-in for edit distance; `1.0` for equal strings, including two
/// empty ones.
pub fn overlap_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let la = a.chars().count();
    let lb = b.chars().count();
    if la == 0 && lb == 0 {
        return 1.0;
    }

    let mut pool: FxHashMap<char, usize> = FxHashMap::default();
    for ch in a.chars() {
        *pool.entry(ch).or_insert(0) += 1;
    }
    let mut common = 0usize;
    for ch in b.chars() {
        if let Some(count) = pool.get_mut(&ch) {
            if *count > 0 {
                *count -= 1;
                common += 1;
            }
        }
    }
    (common as f64 / la.max(lb) as f64).clamp(0.0, 1.0)
}

/// `0` when both are empty, `1` when exactly one is, `1 - similarity` otherwise.
pub fn text_cost(a: &str, b: &str) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 0.0,
        (true, false) | (false, true) => 1.0,
        (false, false) => 1.0 - overlap_similarity(a, b),
    }
}

/// Named patterns for text expected to change between runs (prices, clocks, counters).
#[derive(Debug, Clone, Default)]
pub struct DynamicPatterns {
    patterns: Vec<(String, Regex)>,
}

impl DynamicPatterns {
    /// Compiles the patterns in order; entries that fail to compile are skipped.
    pub fn compile(sources: &IndexMap<String, String>) -> Self {
        let mut patterns = Vec::with_capacity(sources.len());
        for (name, source) in sources {
            match Regex::new(source) {
                Ok(re) => patterns.push((name.clone(), re)),
                Err(err) => {
                    tracing::warn!(pattern = %name, error = %err, "skipping invalid dynamic pattern");
                }
            }
        }
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Name of the first pattern both texts match, if any.
    pub fn shared_pattern(&self, a: &str, b: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(a) && re.is_match(b))
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextRules;

    fn defaults() -> DynamicPatterns {
        DynamicPatterns::compile(&TextRules::default().dynamic_patterns)
    }

    #[test]
    fn similarity_of_identical_strings_is_one() {
        for s in ["", "a", "Submit", "立即下单"] {
            assert_eq!(overlap_similarity(s, s), 1.0);
        }
    }

    #[test]
    fn similarity_counts_shared_characters_once() {
        // "aab" vs "abb": shared multiset {a, b} → 2 / 3.
        assert!((overlap_similarity("aab", "abb") - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(overlap_similarity("abc", "xyz"), 0.0);
        assert_eq!(overlap_similarity("ab", "ba"), 1.0);
    }

    #[test]
    fn similarity_uses_character_length() {
        // 立即下单 vs 去下单 share 下 and 单 → 2 / 4.
        assert_eq!(overlap_similarity("立即下单", "去下单"), 0.5);
    }

    #[test]
    fn text_cost_handles_empty_sides() {
        assert_eq!(text_cost("", ""), 0.0);
        assert_eq!(text_cost("OK", ""), 1.0);
        assert_eq!(text_cost("", "OK"), 1.0);
        assert_eq!(text_cost("OK", "OK"), 0.0);
    }

    #[test]
    fn dynamic_patterns_match_live_data() {
        let p = defaults();
        assert_eq!(p.len(), 4);
        assert_eq!(p.shared_pattern("¥100", "¥200"), Some("currency"));
        assert_eq!(p.shared_pattern("$ 9.99", "￥12"), Some("currency"));
        assert_eq!(p.shared_pattern("9:05", "12:30"), Some("time"));
        assert_eq!(p.shared_pattern("2024-1-5", "2025/12/31"), Some("date"));
        assert_eq!(p.shared_pattern("3", "42"), Some("number"));
    }

    #[test]
    fn dynamic_patterns_require_the_same_pattern() {
        let p = defaults();
        assert_eq!(p.shared_pattern("¥100", "100"), None);
        assert_eq!(p.shared_pattern("12:30", "2024-01-01"), None);
        assert_eq!(p.shared_pattern("Total", "Sum"), None);
    }

    #[test]
    fn invalid_patterns_are_skipped() {
        let mut sources = IndexMap::new();
        sources.insert("broken".to_string(), "(".to_string());
        sources.insert("number".to_string(), r"^\d+$".to_string());
        let p = DynamicPatterns::compile(&sources);
        assert_eq!(p.len(), 1);
        assert_eq!(p.shared_pattern("1", "2"), Some("number"));
    }
}
