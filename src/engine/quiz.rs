use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::question::ComprehensionQuestion;
use crate::engine::bands::{Band, BandTable, ColorTier};
use crate::engine::rounded_percentage;

/// Score at which the quiz screen celebrates the result.
pub const DEFAULT_CELEBRATION_PERCENTAGE: u32 = 70;

/// The reader's selections, keyed by question id. Selecting again for the
/// same question replaces the earlier choice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, String>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from selections keyed by position in `questions`, which is how
    /// the quiz dialog tracks them. Positions past the end are dropped.
    pub fn from_indexed<I, S>(questions: &[ComprehensionQuestion], selections: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut answers = Self::new();
        for (index, option_id) in selections {
            match questions.get(index) {
                Some(question) => {
                    answers.select(&question.id, option_id);
                }
                None => {
                    tracing::debug!(
                        "dropping answer for question index {index}, quiz has {} questions",
                        questions.len()
                    );
                }
            }
        }
        answers
    }

    /// Record a selection, returning the option it replaced.
    pub fn select(&mut self, question_id: &str, option_id: impl Into<String>) -> Option<String> {
        self.0.insert(question_id.to_string(), option_id.into())
    }

    pub fn clear(&mut self, question_id: &str) -> Option<String> {
        self.0.remove(question_id)
    }

    pub fn selected(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub selected_option_id: Option<String>,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub percentage: u32,
    pub correct_count: usize,
    pub total_count: usize,
    pub per_question: Vec<QuestionOutcome>,
}

impl QuizResult {
    pub fn is_perfect(&self) -> bool {
        self.total_count > 0 && self.correct_count == self.total_count
    }

    pub fn celebrates(&self, min_percentage: u32) -> bool {
        self.percentage >= min_percentage
    }

    pub fn answered_count(&self) -> usize {
        self.per_question
            .iter()
            .filter(|o| o.selected_option_id.is_some())
            .count()
    }

    pub fn grade<'a>(&self, grades: &'a BandTable<QuizGrade>) -> &'a QuizGrade {
        grades.lookup(self.percentage)
    }
}

/// One row of the grade table: scores at or above `min_percentage` earn
/// this badge and message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizGrade {
    pub min_percentage: u32,
    pub label: String,
    pub tier: ColorTier,
    pub message: String,
}

impl Band for QuizGrade {
    fn threshold(&self) -> u32 {
        self.min_percentage
    }
}

impl QuizGrade {
    fn new(min_percentage: u32, label: &str, tier: ColorTier, message: &str) -> Self {
        Self {
            min_percentage,
            label: label.to_string(),
            tier,
            message: message.to_string(),
        }
    }

    pub fn defaults() -> Vec<QuizGrade> {
        vec![
            QuizGrade::new(
                90,
                "Reading Master",
                ColorTier::Gold,
                "Outstanding! You're a reading superstar!",
            ),
            QuizGrade::new(
                80,
                "Story Expert",
                ColorTier::Green,
                "Excellent work! Keep it up!",
            ),
            QuizGrade::new(
                70,
                "Good Reader",
                ColorTier::Blue,
                "Good job! You understood the story well!",
            ),
            QuizGrade::new(
                0,
                "Keep Trying",
                ColorTier::Orange,
                "Good effort! Let's practice more to improve!",
            ),
        ]
    }
}

/// Score a quiz. Unanswered questions and selections that match no option
/// of their question count as incorrect. An empty quiz scores 0.
pub fn score(questions: &[ComprehensionQuestion], answers: &AnswerMap) -> QuizResult {
    let per_question: Vec<QuestionOutcome> = questions
        .iter()
        .map(|question| {
            let selected = answers.selected(&question.id);
            let is_correct = match selected {
                Some(option_id) => {
                    if question.option(option_id).is_none() {
                        tracing::debug!(
                            "question {} has no option {option_id}, scoring as incorrect",
                            question.id
                        );
                    }
                    question.is_correct_choice(option_id)
                }
                None => false,
            };
            QuestionOutcome {
                question_id: question.id.clone(),
                selected_option_id: selected.map(str::to_string),
                is_correct,
            }
        })
        .collect();

    let total_count = per_question.len();
    let correct_count = per_question.iter().filter(|o| o.is_correct).count();
    if total_count == 0 {
        tracing::warn!("scoring a quiz with no questions");
    }

    QuizResult {
        percentage: rounded_percentage(correct_count, total_count),
        correct_count,
        total_count,
        per_question,
    }
}
