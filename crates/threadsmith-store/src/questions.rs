//! Generated question documents
//!
//! Two layouts exist. Combination runs store each selection under
//! `<key>_dimension`; category-cycling runs store the single cycled category
//! under `category_info`. Reading accepts either.

use crate::dimensions::DimensionEntry;
use crate::files::{read_text, write_json};
use crate::StoreError;
use serde_json::{Map, Value};
use std::path::Path;
use threadsmith_domain::{Dimension, GeneratedQuestion, QuestionBatch, Selection, CYCLED_CATEGORY_KEY};
use tracing::warn;

const DIMENSION_SUFFIX: &str = "_dimension";
const CATEGORY_INFO: &str = "category_info";

/// Shape of each question object in the output document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionLayout {
    /// `{"question", "<key>_dimension": {dimension, description, examples}, ...}`
    #[default]
    Dimensions,

    /// `{"question", "category_info": {category, instruction, examples}}`
    CategoryInfo,
}

fn question_object(question: &GeneratedQuestion, layout: QuestionLayout) -> Result<Value, serde_json::Error> {
    let mut object = Map::new();
    object.insert("question".into(), Value::String(question.question.clone()));

    match layout {
        QuestionLayout::Dimensions => {
            for selection in &question.selected_dimensions {
                object.insert(
                    format!("{}{}", selection.category, DIMENSION_SUFFIX),
                    serde_json::to_value(DimensionEntry::from(&selection.dimension))?,
                );
            }
        }
        QuestionLayout::CategoryInfo => {
            let (category, instruction, examples) = question
                .selected_dimensions
                .first()
                .map(|s| (s.dimension.name.clone(), s.dimension.description.clone(), s.dimension.examples.clone()))
                .unwrap_or_default();
            object.insert(
                CATEGORY_INFO.into(),
                serde_json::json!({
                    "category": category,
                    "instruction": instruction,
                    "examples": examples,
                }),
            );
        }
    }

    Ok(Value::Object(object))
}

/// Build the `{"questions": [...], "total_generated": n}` document
pub fn questions_document(batch: &QuestionBatch, layout: QuestionLayout) -> Result<Value, StoreError> {
    let questions = batch
        .questions()
        .iter()
        .map(|q| question_object(q, layout))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::Parse(e.to_string()))?;

    let mut document = Map::new();
    document.insert("questions".into(), Value::Array(questions));
    document.insert("total_generated".into(), Value::from(batch.total_generated()));
    Ok(Value::Object(document))
}

/// Write a batch as a question document
pub fn write_questions(path: impl AsRef<Path>, batch: &QuestionBatch, layout: QuestionLayout) -> Result<(), StoreError> {
    let path = path.as_ref();
    let document = questions_document(batch, layout).map_err(|e| StoreError::output_write(path, e))?;
    write_json(path, &document)
}

fn text_field(object: &Value, field: &str) -> String {
    object.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn examples_field(object: &Value) -> Vec<String> {
    object
        .get("examples")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn parse_question(value: &Value) -> Result<GeneratedQuestion, StoreError> {
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::Parse("question entry is not an object".into()))?;

    let mut selected_dimensions = Vec::new();
    for (field, nested) in object {
        if !nested.is_object() {
            continue;
        }
        if field == CATEGORY_INFO {
            let dimension = Dimension::new(
                text_field(nested, "category"),
                text_field(nested, "instruction"),
                examples_field(nested),
            );
            selected_dimensions.push(Selection {
                category: CYCLED_CATEGORY_KEY.to_string(),
                category_name: dimension.name.clone(),
                dimension,
            });
        } else if let Some(key) = field.strip_suffix(DIMENSION_SUFFIX) {
            selected_dimensions.push(Selection {
                category: key.to_string(),
                category_name: key.to_string(),
                dimension: Dimension::new(
                    text_field(nested, "dimension"),
                    text_field(nested, "description"),
                    examples_field(nested),
                ),
            });
        }
    }

    Ok(GeneratedQuestion {
        question: text_field(value, "question"),
        selected_dimensions,
    })
}

/// Parse a question document of either layout
///
/// Missing nested fields read as empty strings.
pub fn parse_questions(text: &str) -> Result<QuestionBatch, StoreError> {
    let document: Value = serde_json::from_str(text).map_err(|e| StoreError::Parse(e.to_string()))?;
    let entries = document
        .get("questions")
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::Parse("expected a \"questions\" array".into()))?;

    let batch = entries.iter().map(parse_question).collect::<Result<QuestionBatch, _>>()?;

    if let Some(declared) = document.get("total_generated").and_then(Value::as_u64) {
        if declared as usize != batch.total_generated() {
            warn!(
                "Document declares {} questions but contains {}",
                declared,
                batch.total_generated()
            );
        }
    }
    Ok(batch)
}

/// Read a question document from disk
pub fn read_questions(path: impl AsRef<Path>) -> Result<QuestionBatch, StoreError> {
    let path = path.as_ref();
    parse_questions(&read_text(path)?).map_err(|e| e.in_file(path))
}
