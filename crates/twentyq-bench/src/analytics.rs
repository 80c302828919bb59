use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;
use twentyq_bot::{SessionOutcome, SessionResult};
use twentyq_core::model::catalog::Catalog;

use crate::config::{BenchmarkConfig, ResponderKindConfig};

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("responder '{0}' produced results but is missing from configuration")]
    UnknownResponder(String),
    #[error("session secret {secret} is outside the catalog (pool size {pool})")]
    UnknownSecret { secret: usize, pool: usize },
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    responders: HashMap<String, ResponderAccumulator>,
    responder_order: Vec<String>,
    candidates: Vec<CandidateAccumulator>,
    engine_label: String,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig, catalog: &Catalog) -> Self {
        let mut responders = HashMap::new();
        let mut order = Vec::new();
        for responder in &config.responders {
            responders.insert(
                responder.name.clone(),
                ResponderAccumulator::new(responder.name.clone(), responder.kind),
            );
            order.push(responder.name.clone());
        }

        let candidates = catalog
            .candidates()
            .iter()
            .map(|profile| CandidateAccumulator {
                name: profile.name.clone(),
                sessions: 0,
                wins: 0,
                questions: 0,
            })
            .collect();

        Self {
            responders,
            responder_order: order,
            candidates,
            engine_label: format!(
                "threshold {}, min questions {}",
                config.engine.confirm_threshold, config.engine.min_questions
            ),
        }
    }

    pub fn record(&mut self, responder: &str, outcome: &SessionOutcome) -> Result<(), AnalyticsError> {
        let pool = self.candidates.len();
        let candidate = self
            .candidates
            .get_mut(outcome.secret)
            .ok_or(AnalyticsError::UnknownSecret {
                secret: outcome.secret,
                pool,
            })?;
        let acc = self
            .responders
            .get_mut(responder)
            .ok_or_else(|| AnalyticsError::UnknownResponder(responder.to_string()))?;

        let won = outcome.result == SessionResult::Won;
        acc.sessions += 1;
        acc.questions += outcome.questions_asked;
        acc.rejected += outcome.rejected_guesses;
        if won {
            acc.wins += 1;
        }
        if outcome.exhausted && !won {
            acc.exhausted += 1;
        }

        candidate.sessions += 1;
        candidate.questions += outcome.questions_asked;
        if won {
            candidate.wins += 1;
        }
        Ok(())
    }

    pub fn finalize(mut self) -> AnalyticsSummary {
        let z = z_score(CONFIDENCE_LEVEL);
        let mut responders = Vec::new();
        for name in &self.responder_order {
            if let Some(acc) = self.responders.remove(name) {
                responders.push(acc.into_report(z));
            }
        }

        let candidates = self
            .candidates
            .into_iter()
            .map(|acc| CandidateReport {
                win_rate: ratio(acc.wins, acc.sessions),
                avg_questions: ratio(acc.questions, acc.sessions),
                name: acc.name,
                sessions: acc.sessions,
            })
            .collect();

        AnalyticsSummary {
            engine: self.engine_label,
            confidence_level: CONFIDENCE_LEVEL,
            responders,
            candidates,
        }
    }
}

struct ResponderAccumulator {
    name: String,
    kind: ResponderKindConfig,
    sessions: usize,
    wins: usize,
    exhausted: usize,
    questions: usize,
    rejected: usize,
}

impl ResponderAccumulator {
    fn new(name: String, kind: ResponderKindConfig) -> Self {
        Self {
            name,
            kind,
            sessions: 0,
            wins: 0,
            exhausted: 0,
            questions: 0,
            rejected: 0,
        }
    }

    fn into_report(self, z: f64) -> ResponderReport {
        let win_rate = ratio(self.wins, self.sessions);
        ResponderReport {
            ci: proportion_interval(win_rate, self.sessions, z),
            win_rate,
            avg_questions: ratio(self.questions, self.sessions),
            avg_rejected: ratio(self.rejected, self.sessions),
            name: self.name,
            kind: self.kind,
            sessions: self.sessions,
            wins: self.wins,
            exhausted: self.exhausted,
        }
    }
}

struct CandidateAccumulator {
    name: String,
    sessions: usize,
    wins: usize,
    questions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponderReport {
    pub name: String,
    pub kind: ResponderKindConfig,
    pub sessions: usize,
    pub wins: usize,
    pub exhausted: usize,
    pub win_rate: f64,
    pub ci: (f64, f64),
    pub avg_questions: f64,
    pub avg_rejected: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub name: String,
    pub sessions: usize,
    pub win_rate: f64,
    pub avg_questions: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub engine: String,
    pub confidence_level: f64,
    pub responders: Vec<ResponderReport>,
    pub candidates: Vec<CandidateReport>,
}

impl AnalyticsSummary {
    pub fn render_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Session Summary\n\n");
        rows.push_str(&format!("Engine policy: {}\n\n", self.engine));
        rows.push_str(&format!(
            "| Responder | Kind | Sessions | Win % | {:.0}% CI | Avg questions | Avg rejected | Exhausted |\n",
            self.confidence_level * 100.0
        ));
        rows.push_str("|-----------|------|----------|-------|--------|---------------|--------------|-----------|\n");

        for responder in &self.responders {
            rows.push_str(&format!(
                "| {name} | {kind:?} | {sessions} | {win:.1}% | [{low:.1}%, {high:.1}%] | {questions:.2} | {rejected:.2} | {exhausted} |\n",
                name = responder.name,
                kind = responder.kind,
                sessions = responder.sessions,
                win = responder.win_rate * 100.0,
                low = responder.ci.0 * 100.0,
                high = responder.ci.1 * 100.0,
                questions = responder.avg_questions,
                rejected = responder.avg_rejected,
                exhausted = responder.exhausted,
            ));
        }

        rows.push_str("\n## By secret\n\n");
        rows.push_str("| Candidate | Sessions | Win % | Avg questions |\n");
        rows.push_str("|-----------|----------|-------|---------------|\n");
        for candidate in &self.candidates {
            rows.push_str(&format!(
                "| {} | {} | {:.1}% | {:.2} |\n",
                candidate.name,
                candidate.sessions,
                candidate.win_rate * 100.0,
                candidate.avg_questions
            ));
        }

        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.render_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn z_score(confidence: f64) -> f64 {
    Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + confidence / 2.0))
        .unwrap_or(1.96)
}

/// Normal-approximation interval for a proportion, clamped to [0, 1].
fn proportion_interval(rate: f64, samples: usize, z: f64) -> (f64, f64) {
    if samples == 0 {
        return (0.0, 0.0);
    }
    let margin = z * (rate * (1.0 - rate) / samples as f64).sqrt();
    ((rate - margin).max(0.0), (rate + margin).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        EngineSection, LoggingConfig, OutputsConfig, ResponderConfig, SessionsConfig,
    };

    fn config() -> BenchmarkConfig {
        BenchmarkConfig {
            run_id: "unit".into(),
            sessions: SessionsConfig {
                seed: Some(1),
                rounds: 1,
            },
            engine: EngineSection::default(),
            catalog: None,
            responders: vec![ResponderConfig {
                name: "oracle".into(),
                kind: ResponderKindConfig::Oracle,
                params: serde_yaml::Value::Null,
            }],
            outputs: OutputsConfig {
                jsonl: "out.jsonl".into(),
                summary_md: "out.md".into(),
            },
            logging: LoggingConfig::default(),
        }
    }

    fn outcome(secret: usize, won: bool, questions: usize) -> SessionOutcome {
        SessionOutcome {
            secret,
            result: if won {
                SessionResult::Won
            } else {
                SessionResult::OutOfQuestions
            },
            guessed: won.then_some(secret),
            questions_asked: questions,
            rejected_guesses: if won { 0 } else { 2 },
            exhausted: false,
        }
    }

    #[test]
    fn z_score_matches_standard_normal_quantile() {
        assert!((z_score(0.95) - 1.959964).abs() < 1e-4);
    }

    #[test]
    fn interval_is_clamped_and_symmetric() {
        let (low, high) = proportion_interval(0.5, 100, 1.96);
        assert!((low - 0.402).abs() < 1e-3);
        assert!((high - 0.598).abs() < 1e-3);
        assert_eq!(proportion_interval(1.0, 10, 1.96), (1.0, 1.0));
        assert_eq!(proportion_interval(0.3, 0, 1.96), (0.0, 0.0));
    }

    #[test]
    fn collector_aggregates_per_responder_and_secret() {
        let catalog = Catalog::standard();
        let mut collector = AnalyticsCollector::new(&config(), &catalog);
        collector.record("oracle", &outcome(0, true, 3)).unwrap();
        collector.record("oracle", &outcome(1, false, 20)).unwrap();

        let summary = collector.finalize();
        let oracle = &summary.responders[0];
        assert_eq!(oracle.sessions, 2);
        assert_eq!(oracle.wins, 1);
        assert!((oracle.avg_questions - 11.5).abs() < 1e-9);
        assert!((oracle.avg_rejected - 1.0).abs() < 1e-9);
        assert_eq!(summary.candidates[0].win_rate, 1.0);
        assert_eq!(summary.candidates[1].win_rate, 0.0);
        assert_eq!(summary.candidates[2].sessions, 0);

        let markdown = summary.render_markdown();
        assert!(markdown.contains("| oracle | Oracle | 2 | 50.0% |"));
        assert!(markdown.contains("| Flipper Zero | 1 | 100.0% | 3.00 |"));
    }

    #[test]
    fn unknown_responder_and_secret_are_errors() {
        let catalog = Catalog::standard();
        let mut collector = AnalyticsCollector::new(&config(), &catalog);
        assert!(matches!(
            collector.record("ghost", &outcome(0, true, 3)),
            Err(AnalyticsError::UnknownResponder(_))
        ));
        assert!(matches!(
            collector.record("oracle", &outcome(9, true, 3)),
            Err(AnalyticsError::UnknownSecret { secret: 9, pool: 6 })
        ));
    }
}
