use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionCategory {
    Character,
    Plot,
    Vocabulary,
    Prediction,
    MainIdea,
    Details,
    Sequence,
    CauseEffect,
}

impl QuestionCategory {
    pub fn to_key(self) -> &'static str {
        match self {
            QuestionCategory::Character => "character",
            QuestionCategory::Plot => "plot",
            QuestionCategory::Vocabulary => "vocabulary",
            QuestionCategory::Prediction => "prediction",
            QuestionCategory::MainIdea => "main-idea",
            QuestionCategory::Details => "details",
            QuestionCategory::Sequence => "sequence",
            QuestionCategory::CauseEffect => "cause-effect",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.to_key() == key)
    }

    pub fn all() -> &'static [QuestionCategory] {
        &[
            QuestionCategory::Character,
            QuestionCategory::Plot,
            QuestionCategory::Vocabulary,
            QuestionCategory::Prediction,
            QuestionCategory::MainIdea,
            QuestionCategory::Details,
            QuestionCategory::Sequence,
            QuestionCategory::CauseEffect,
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    #[serde(alias = "isCorrect")]
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensionQuestion {
    pub id: String,
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub explanation: String,
    pub category: QuestionCategory,
    /// Page the question pops up on while reading; `None` for questions
    /// asked after the book is finished.
    #[serde(default, alias = "pageNumber")]
    pub page_number: Option<u32>,
}

impl ComprehensionQuestion {
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|opt| opt.id == option_id)
    }

    /// Whether picking `option_id` earns credit. Ids that match no option
    /// never do.
    pub fn is_correct_choice(&self, option_id: &str) -> bool {
        self.option(option_id).is_some_and(|opt| opt.is_correct)
    }

    pub fn correct_option_count(&self) -> usize {
        self.options.iter().filter(|opt| opt.is_correct).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub questions: Vec<ComprehensionQuestion>,
}

impl QuestionSet {
    /// Questions shown on `page` that the reader has not answered yet.
    pub fn questions_for_page<'a>(
        &'a self,
        page: u32,
        answered: &HashSet<String>,
    ) -> Vec<&'a ComprehensionQuestion> {
        self.questions
            .iter()
            .filter(|q| q.page_number == Some(page) && !answered.contains(&q.id))
            .collect()
    }

    /// Questions asked once the book is finished.
    pub fn post_reading(&self) -> Vec<&ComprehensionQuestion> {
        self.questions
            .iter()
            .filter(|q| q.page_number.is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, page: Option<u32>) -> ComprehensionQuestion {
        ComprehensionQuestion {
            id: id.to_string(),
            prompt: "Who found the path?".to_string(),
            options: vec![
                QuestionOption {
                    id: "a".to_string(),
                    text: "Emma".to_string(),
                    is_correct: true,
                },
                QuestionOption {
                    id: "b".to_string(),
                    text: "Luna".to_string(),
                    is_correct: false,
                },
            ],
            hint: String::new(),
            explanation: String::new(),
            category: QuestionCategory::Details,
            page_number: page,
        }
    }

    #[test]
    fn test_category_keys_roundtrip() {
        for &category in QuestionCategory::all() {
            assert_eq!(QuestionCategory::from_key(category.to_key()), Some(category));
        }
        assert_eq!(QuestionCategory::from_key("riddle"), None);
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        let json = serde_json::to_string(&QuestionCategory::CauseEffect).unwrap();
        assert_eq!(json, "\"cause-effect\"");
        let parsed: QuestionCategory = serde_json::from_str("\"main-idea\"").unwrap();
        assert_eq!(parsed, QuestionCategory::MainIdea);
    }

    #[test]
    fn test_unknown_option_is_not_correct() {
        let q = question("q1", None);
        assert!(q.is_correct_choice("a"));
        assert!(!q.is_correct_choice("b"));
        assert!(!q.is_correct_choice("z"));
    }

    #[test]
    fn test_accepts_camel_case_fields() {
        let json = r#"{
            "id": "q9",
            "question": "What happens next?",
            "options": [{ "id": "a", "text": "More adventures", "isCorrect": true }],
            "category": "prediction",
            "pageNumber": 3
        }"#;
        let q: ComprehensionQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.prompt, "What happens next?");
        assert!(q.options[0].is_correct);
        assert_eq!(q.page_number, Some(3));
        assert!(q.hint.is_empty());
    }

    #[test]
    fn test_questions_for_page_skips_answered() {
        let set = QuestionSet {
            name: "forest".to_string(),
            title: String::new(),
            questions: vec![
                question("q1", Some(1)),
                question("q2", Some(1)),
                question("q3", Some(2)),
                question("pr1", None),
            ],
        };
        let answered: HashSet<String> = ["q1".to_string()].into_iter().collect();
        let ids: Vec<&str> = set
            .questions_for_page(1, &answered)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ids, vec!["q2"]);
        assert_eq!(set.post_reading().len(), 1);
    }
}
