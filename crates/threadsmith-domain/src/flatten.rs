//! Result flattener - project a question batch onto a fixed column schema
//!
//! The schema is decided up front by the caller; it is never inferred from
//! the data. Every row has exactly one cell per column, and anything missing
//! renders as an empty string.

use crate::combination::CYCLED_CATEGORY_KEY;
use crate::dimension::column_label;
use crate::question::{GeneratedQuestion, QuestionBatch};

/// Delimiter used to join multi-valued fields into one cell
pub const MULTI_VALUE_DELIMITER: &str = " | ";

/// A field of a generated question that a column can project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    /// The question text
    Question,
    /// Name of the dimension selected for a category key
    DimensionName(String),
    /// Description of the dimension selected for a category key
    DimensionDescription(String),
    /// Examples of the dimension selected for a category key, joined
    DimensionExamples(String),
}

impl FieldPath {
    /// Resolve the field against one question
    pub fn resolve(&self, question: &GeneratedQuestion) -> String {
        match self {
            FieldPath::Question => question.question.clone(),
            FieldPath::DimensionName(key) => question
                .selection(key)
                .map(|s| s.dimension.name.clone())
                .unwrap_or_default(),
            FieldPath::DimensionDescription(key) => question
                .selection(key)
                .map(|s| s.dimension.description.clone())
                .unwrap_or_default(),
            FieldPath::DimensionExamples(key) => question
                .selection(key)
                .map(|s| s.dimension.examples.join(MULTI_VALUE_DELIMITER))
                .unwrap_or_default(),
        }
    }
}

/// A named output column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text
    pub header: String,

    /// Field the column projects
    pub field: FieldPath,
}

impl Column {
    /// Create a column
    pub fn new(header: impl Into<String>, field: FieldPath) -> Self {
        Self {
            header: header.into(),
            field,
        }
    }

    /// Schema for combination output: `Question, <Key>_Dimension, ...`
    pub fn dimension_schema<S: AsRef<str>>(keys: &[S]) -> Vec<Column> {
        let mut columns = vec![Column::new("Question", FieldPath::Question)];
        columns.extend(keys.iter().map(|key| {
            let key = key.as_ref();
            Column::new(
                format!("{}_Dimension", column_label(key)),
                FieldPath::DimensionName(key.to_string()),
            )
        }));
        columns
    }

    /// Schema for category-cycling output: `question, category, instruction, examples`
    pub fn category_schema() -> Vec<Column> {
        let key = CYCLED_CATEGORY_KEY.to_string();
        vec![
            Column::new("question", FieldPath::Question),
            Column::new("category", FieldPath::DimensionName(key.clone())),
            Column::new("instruction", FieldPath::DimensionDescription(key.clone())),
            Column::new("examples", FieldPath::DimensionExamples(key)),
        ]
    }
}

/// A flat, uniformly shaped table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTable {
    /// Column headers
    pub headers: Vec<String>,

    /// Rows, each with one cell per header
    pub rows: Vec<Vec<String>>,
}

impl FlatTable {
    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Flatten a batch into one row per question
///
/// # Examples
///
/// ```
/// use threadsmith_domain::{flatten, Column, QuestionBatch};
///
/// let table = flatten(&QuestionBatch::default(), &Column::dimension_schema(&["intent"]));
/// assert_eq!(table.headers, vec!["Question", "Intent_Dimension"]);
/// assert!(table.is_empty());
/// ```
pub fn flatten(batch: &QuestionBatch, columns: &[Column]) -> FlatTable {
    let headers = columns.iter().map(|c| c.header.clone()).collect();
    let rows = batch
        .questions()
        .iter()
        .map(|question| columns.iter().map(|c| c.field.resolve(question)).collect())
        .collect();

    FlatTable { headers, rows }
}
