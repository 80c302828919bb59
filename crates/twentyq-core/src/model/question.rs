use crate::error::EngineError;
use crate::model::answer::Answer;
use crate::model::catalog::CatalogError;

/// One yes/no prompt with the score deltas each answer applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    yes_weights: Vec<i32>,
    no_weights: Vec<i32>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, yes_weights: Vec<i32>, no_weights: Vec<i32>) -> Self {
        Self {
            prompt: prompt.into(),
            yes_weights,
            no_weights,
        }
    }

    /// Builds a question whose "no" weights negate its "yes" weights.
    pub fn symmetric(prompt: impl Into<String>, yes_weights: Vec<i32>) -> Self {
        let no_weights = yes_weights.iter().map(|w| -w).collect();
        Self::new(prompt, yes_weights, no_weights)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn weights(&self, answer: Answer) -> &[i32] {
        match answer {
            Answer::Yes => &self.yes_weights,
            Answer::No => &self.no_weights,
        }
    }
}

/// Ordered, immutable question list. Its length is the session's question
/// budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
    pool_size: usize,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>, pool_size: usize) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::EmptyBank);
        }

        for (index, question) in questions.iter().enumerate() {
            for answer in Answer::BOTH {
                let found = question.weights(answer).len();
                if found != pool_size {
                    return Err(CatalogError::WeightLength {
                        question: index,
                        answer,
                        expected: pool_size,
                        found,
                    });
                }
            }
        }

        Ok(Self {
            questions,
            pool_size,
        })
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn question(&self, index: usize) -> Result<&Question, EngineError> {
        self.questions.get(index).ok_or(EngineError::OutOfRange {
            index,
            len: self.questions.len(),
        })
    }

    pub fn question_text(&self, index: usize) -> Result<&str, EngineError> {
        self.question(index).map(Question::prompt)
    }

    pub fn weights(&self, index: usize, answer: Answer) -> Result<&[i32], EngineError> {
        self.question(index).map(|q| q.weights(answer))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
