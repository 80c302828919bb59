pub const DEFAULT_CONFIRM_THRESHOLD: i32 = 6;
pub const DEFAULT_MIN_QUESTIONS_BEFORE_GUESS: usize = 3;

/// Guessing policy injected into an engine at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub confirm_threshold: i32,
    pub min_questions_before_guess: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CONFIRM_THRESHOLD,
            DEFAULT_MIN_QUESTIONS_BEFORE_GUESS,
        )
    }
}

impl EngineConfig {
    pub const fn new(confirm_threshold: i32, min_questions_before_guess: usize) -> Self {
        Self {
            confirm_threshold,
            min_questions_before_guess,
        }
    }

    pub fn with_confirm_threshold(mut self, threshold: i32) -> Self {
        self.confirm_threshold = threshold;
        self
    }

    pub fn with_min_questions(mut self, min_questions: usize) -> Self {
        self.min_questions_before_guess = min_questions;
        self
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let confirm_threshold = read("TWENTYQ_CONFIRM_THRESHOLD")
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .unwrap_or(defaults.confirm_threshold);

        let min_questions_before_guess = read("TWENTYQ_MIN_QUESTIONS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(defaults.min_questions_before_guess);

        Self {
            confirm_threshold,
            min_questions_before_guess,
        }
    }

    /// True when the engine may propose `best_score` after `answered`
    /// questions.
    pub const fn allows_guess(&self, answered: usize, best_score: i32) -> bool {
        answered >= self.min_questions_before_guess && best_score >= self.confirm_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;
    use std::collections::HashMap;

    fn reader(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_standard_policy() {
        let config = EngineConfig::default();
        assert_eq!(config.confirm_threshold, 6);
        assert_eq!(config.min_questions_before_guess, 3);
    }

    #[test]
    fn env_overrides_are_parsed() {
        let config = EngineConfig::from_reader(reader(&[
            ("TWENTYQ_CONFIRM_THRESHOLD", " 9 "),
            ("TWENTYQ_MIN_QUESTIONS", "5"),
        ]));
        assert_eq!(config, EngineConfig::new(9, 5));
    }

    #[test]
    fn invalid_env_values_fall_back_to_defaults() {
        let config = EngineConfig::from_reader(reader(&[
            ("TWENTYQ_CONFIRM_THRESHOLD", "high"),
            ("TWENTYQ_MIN_QUESTIONS", "-1"),
        ]));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn guess_requires_both_conditions() {
        let config = EngineConfig::default();
        assert!(!config.allows_guess(2, 10));
        assert!(!config.allows_guess(3, 5));
        assert!(config.allows_guess(3, 6));
    }
}
