//! Dimension and prompt-category documents
//!
//! Both documents are JSON objects whose key order is the declaration order
//! of the categories. That order drives combination order, so parsing keeps
//! it and returns explicit ordered lists.

use crate::files::{read_text, write_json};
use crate::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use threadsmith_domain::{Dimension, DimensionCategory, PromptCategory};

/// A dimension as it appears in JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DimensionEntry {
    pub(crate) dimension: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) examples: Vec<String>,
}

impl From<DimensionEntry> for Dimension {
    fn from(entry: DimensionEntry) -> Self {
        Dimension::new(entry.dimension, entry.description, entry.examples)
    }
}

impl From<&Dimension> for DimensionEntry {
    fn from(dimension: &Dimension) -> Self {
        Self {
            dimension: dimension.name.clone(),
            description: dimension.description.clone(),
            examples: dimension.examples.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PromptCategoryEntry {
    category: String,
    #[serde(default)]
    instruction: String,
    #[serde(default)]
    examples: Vec<String>,
}

fn parse_object(text: &str) -> Result<Map<String, Value>, StoreError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) if map.is_empty() => Err(StoreError::Parse("document declares no categories".into())),
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::Parse("expected a JSON object of categories".into())),
        Err(e) => Err(StoreError::Parse(e.to_string())),
    }
}

/// Parse a dimension document: `{"<category>": [{dimension, description, examples}, ...]}`
///
/// Categories come back in declaration order with keys derived from their
/// names and made unique.
///
/// # Examples
///
/// ```
/// use threadsmith_store::parse_dimension_categories;
///
/// let json = r#"{"Intent": [{"dimension": "I1", "description": "", "examples": []}], "Domain": []}"#;
/// let categories = parse_dimension_categories(json).unwrap();
/// assert_eq!(categories[0].key, "intent");
/// assert!(categories[1].is_empty());
/// ```
pub fn parse_dimension_categories(text: &str) -> Result<Vec<DimensionCategory>, StoreError> {
    let mut categories = parse_object(text)?
        .into_iter()
        .map(|(name, value)| {
            let entries: Vec<DimensionEntry> = serde_json::from_value(value)
                .map_err(|e| StoreError::Parse(format!("category '{}': {}", name, e)))?;
            Ok(DimensionCategory::new(name, entries.into_iter().map(Dimension::from).collect()))
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    ensure_unique_keys(&mut categories);
    Ok(categories)
}

/// Read a dimension document from disk
pub fn read_dimensions(path: impl AsRef<Path>) -> Result<Vec<DimensionCategory>, StoreError> {
    let path = path.as_ref();
    parse_dimension_categories(&read_text(path)?).map_err(|e| e.in_file(path))
}

/// Write categories as a dimension document
pub fn write_dimensions(path: impl AsRef<Path>, categories: &[DimensionCategory]) -> Result<(), StoreError> {
    let path = path.as_ref();
    let document = categories
        .iter()
        .map(|category| {
            let entries: Vec<DimensionEntry> = category.dimensions.iter().map(DimensionEntry::from).collect();
            serde_json::to_value(entries).map(|value| (category.name.clone(), value))
        })
        .collect::<Result<Map<String, Value>, _>>()
        .map_err(|e| StoreError::output_write(path, e))?;
    write_json(path, &document)
}

/// Override derived keys with configured aliases (category name to key)
pub fn apply_key_aliases(categories: &mut [DimensionCategory], aliases: &HashMap<String, String>) {
    for category in categories.iter_mut() {
        if let Some(alias) = aliases.get(&category.name) {
            category.key = alias.clone();
        }
    }
    ensure_unique_keys(categories);
}

/// Suffix repeated keys with `_2`, `_3`, ... in declaration order
fn ensure_unique_keys(categories: &mut [DimensionCategory]) {
    let mut used = HashSet::new();
    for category in categories.iter_mut() {
        if used.insert(category.key.clone()) {
            continue;
        }
        let mut n = 2;
        while !used.insert(format!("{}_{}", category.key, n)) {
            n += 1;
        }
        category.key = format!("{}_{}", category.key, n);
    }
}

/// Parse a prompt-category document: `{"<key>": {category, instruction, examples}}`
pub fn parse_prompt_categories(text: &str) -> Result<Vec<PromptCategory>, StoreError> {
    parse_object(text)?
        .into_iter()
        .map(|(key, value)| {
            let entry: PromptCategoryEntry = serde_json::from_value(value)
                .map_err(|e| StoreError::Parse(format!("category '{}': {}", key, e)))?;
            Ok(PromptCategory {
                key,
                name: entry.category,
                instruction: entry.instruction,
                examples: entry.examples,
            })
        })
        .collect()
}

/// Read a prompt-category document from disk
pub fn read_prompt_categories(path: impl AsRef<Path>) -> Result<Vec<PromptCategory>, StoreError> {
    let path = path.as_ref();
    parse_prompt_categories(&read_text(path)?).map_err(|e| e.in_file(path))
}
