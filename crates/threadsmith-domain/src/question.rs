//! Generated questions and the batch that collects them

use crate::combination::{Combination, Selection};

/// A question produced by the generator for one combination
///
/// Immutable once created: it carries the exact selections that produced it,
/// one per category, in category order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuestion {
    /// The generated question text
    pub question: String,

    /// The combination that produced the question
    pub selected_dimensions: Vec<Selection>,
}

impl GeneratedQuestion {
    /// Attach generated text to the combination it came from
    pub fn from_combination(question: impl Into<String>, combination: Combination) -> Self {
        Self {
            question: question.into(),
            selected_dimensions: combination.selections,
        }
    }

    /// Look up the selection made for a category key
    pub fn selection(&self, category: &str) -> Option<&Selection> {
        self.selected_dimensions
            .iter()
            .find(|s| s.category == category)
    }
}

/// The successfully generated questions of one run
///
/// Failed combinations never enter the batch, so `total_generated()` is
/// always the number of questions held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBatch {
    questions: Vec<GeneratedQuestion>,
}

impl QuestionBatch {
    /// Create a batch from already ordered questions
    pub fn new(questions: Vec<GeneratedQuestion>) -> Self {
        Self { questions }
    }

    /// Append a question
    pub fn push(&mut self, question: GeneratedQuestion) {
        self.questions.push(question);
    }

    /// The questions, in generation order
    pub fn questions(&self) -> &[GeneratedQuestion] {
        &self.questions
    }

    /// Number of questions generated
    pub fn total_generated(&self) -> usize {
        self.questions.len()
    }

    /// Whether the batch holds no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Consume the batch, returning its questions
    pub fn into_questions(self) -> Vec<GeneratedQuestion> {
        self.questions
    }
}

impl FromIterator<GeneratedQuestion> for QuestionBatch {
    fn from_iter<I: IntoIterator<Item = GeneratedQuestion>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{combine, Dimension, DimensionCategory};

    #[test]
    fn test_question_keeps_selections() {
        let categories = vec![
            DimensionCategory::new("Intent", vec![Dimension::new("I1", "", vec![])]),
            DimensionCategory::new("Persona", vec![Dimension::new("P1", "", vec![])]),
        ];
        let combination = combine(&categories).remove(0);
        let question = GeneratedQuestion::from_combination("How do we...?", combination);

        assert_eq!(question.selected_dimensions.len(), 2);
        assert_eq!(question.selection("persona").unwrap().dimension.name, "P1");
        assert!(question.selection("domain").is_none());
    }

    #[test]
    fn test_batch_total_tracks_length() {
        let mut batch = QuestionBatch::default();
        assert_eq!(batch.total_generated(), 0);
        assert!(batch.is_empty());

        batch.push(GeneratedQuestion {
            question: "Q1".to_string(),
            selected_dimensions: vec![],
        });
        assert_eq!(batch.total_generated(), 1);
        assert_eq!(batch.questions()[0].question, "Q1");
    }
}
