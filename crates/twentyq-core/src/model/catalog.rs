use crate::model::answer::Answer;
use crate::model::candidate::CandidateProfile;
use crate::model::question::{Question, QuestionBank};
use core::fmt;

pub const STANDARD_POOL_SIZE: usize = 6;
pub const STANDARD_QUESTION_COUNT: usize = 20;

const STANDARD_CANDIDATES: [(&str, &str); STANDARD_POOL_SIZE] = [
    ("Flipper Zero", "Handheld multi-tool"),
    ("TV Remote", "Handheld IR device"),
    ("Car Key Fob", "Portable RF device"),
    ("RFID Card", "Access device"),
    ("Smartphone", "Smart handheld device"),
    ("Game Controller", "Interactive controller"),
];

const STANDARD_QUESTIONS: [(&str, [i32; STANDARD_POOL_SIZE]); STANDARD_QUESTION_COUNT] = [
    ("Is it electronic?", [3, 0, 0, 0, 2, 1]),
    ("Does it use batteries?", [2, 1, 1, 1, 3, 0]),
    ("Is it portable?", [2, 2, 2, 1, 2, 3]),
    ("Does it emit RF?", [2, 0, 3, 0, 1, 0]),
    ("Does it have buttons?", [2, 3, 1, 0, 2, 3]),
    ("Is it used for access?", [1, 0, 2, 3, 0, 1]),
    ("Is it handheld?", [2, 1, 3, 2, 1, 2]),
    ("Does it connect to a phone?", [1, 0, 0, 0, 3, 1]),
    ("Does it have a screen?", [1, 0, 0, 0, 3, 0]),
    ("Is it for gaming?", [0, 0, 0, 0, 0, 3]),
    ("Is it security related?", [1, 0, 0, 3, 0, 0]),
    ("Does it require charging?", [1, 0, 0, 0, 2, 0]),
    ("Is it used daily?", [2, 2, 1, 0, 2, 1]),
    ("Does it interact wirelessly?", [1, 0, 1, 0, 1, 2]),
    ("Is it programmable?", [1, 0, 0, 0, 1, 0]),
    ("Is it battery powered?", [1, 1, 1, 0, 2, 1]),
    ("Is it a common device?", [1, 1, 0, 0, 2, 1]),
    ("Is it a consumer gadget?", [1, 0, 0, 0, 2, 1]),
    ("Does it control something?", [2, 0, 0, 0, 1, 2]),
    ("Does it clone signals?", [1, 0, 1, 0, 0, 0]),
];

/// Candidate roster plus the question bank scored against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    candidates: Vec<CandidateProfile>,
    bank: QuestionBank,
}

impl Catalog {
    pub fn new(
        candidates: Vec<CandidateProfile>,
        questions: Vec<Question>,
    ) -> Result<Self, CatalogError> {
        if candidates.is_empty() {
            return Err(CatalogError::EmptyPool);
        }
        let bank = QuestionBank::new(questions, candidates.len())?;
        Ok(Self { candidates, bank })
    }

    /// The built-in pocket-gadget catalog.
    pub fn standard() -> Self {
        let candidates = STANDARD_CANDIDATES
            .iter()
            .map(|(name, category)| CandidateProfile::new(*name, *category))
            .collect();
        let questions = STANDARD_QUESTIONS
            .iter()
            .map(|(prompt, yes)| Question::symmetric(*prompt, yes.to_vec()))
            .collect();
        Self::new(candidates, questions).expect("standard catalog is well formed")
    }

    pub fn candidates(&self) -> &[CandidateProfile] {
        &self.candidates
    }

    pub fn pool_size(&self) -> usize {
        self.candidates.len()
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn question_count(&self) -> usize {
        self.bank.question_count()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.candidates
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnsupportedSchema(String),
    EmptyPool,
    EmptyBank,
    WeightLength {
        question: usize,
        answer: Answer,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "I/O error: {err}"),
            CatalogError::Json(err) => write!(f, "JSON error: {err}"),
            CatalogError::UnsupportedSchema(version) => {
                write!(f, "unsupported catalog schema version: {version}")
            }
            CatalogError::EmptyPool => f.write_str("catalog must list at least one candidate"),
            CatalogError::EmptyBank => f.write_str("catalog must list at least one question"),
            CatalogError::WeightLength {
                question,
                answer,
                expected,
                found,
            } => write!(
                f,
                "question {question} has {found} {answer} weights, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(value: std::io::Error) -> Self {
        CatalogError::Io(value)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        CatalogError::Json(value)
    }
}
