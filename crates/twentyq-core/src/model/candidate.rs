use serde::{Deserialize, Serialize};

/// Immutable description of one possible answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub category: String,
}

impl CandidateProfile {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    profile: CandidateProfile,
    score: i32,
    eliminated: bool,
}

impl Candidate {
    pub fn new(profile: CandidateProfile) -> Self {
        Self {
            profile,
            score: 0,
            eliminated: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn category(&self) -> &str {
        &self.profile.category
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }
}

/// Per-session scores and elimination flags for the whole roster.
///
/// The pool is sized once from the roster and then only ever reset in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
}

impl CandidatePool {
    pub fn from_profiles(profiles: &[CandidateProfile]) -> Self {
        Self {
            candidates: profiles.iter().cloned().map(Candidate::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn reset(&mut self) {
        for candidate in &mut self.candidates {
            candidate.score = 0;
            candidate.eliminated = false;
        }
    }

    /// Adds `weights[i]` to every candidate still in play, saturating at the
    /// `i32` bounds. Eliminated candidates keep their score.
    pub fn apply_weights(&mut self, weights: &[i32]) {
        for (candidate, weight) in self.candidates.iter_mut().zip(weights) {
            if !candidate.eliminated {
                candidate.score = candidate.score.saturating_add(*weight);
            }
        }
    }

    pub fn eliminate(&mut self, index: usize) {
        if let Some(candidate) = self.candidates.get_mut(index) {
            candidate.eliminated = true;
        }
    }

    /// Highest-scoring candidate still in play. Ties go to the lowest index.
    pub fn best(&self) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (index, candidate) in self.candidates.iter().enumerate() {
            if candidate.eliminated {
                continue;
            }
            match best {
                Some((_, score)) if candidate.score <= score => {}
                _ => best = Some((index, candidate.score)),
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn remaining(&self) -> usize {
        self.candidates.iter().filter(|c| !c.eliminated).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.candidates.iter().all(|c| c.eliminated)
    }
}
