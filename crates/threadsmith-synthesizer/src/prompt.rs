//! Prompt templates for question generation and dimension discovery

use crate::error::SynthesizerError;
use std::collections::{BTreeSet, HashMap};
use threadsmith_domain::{Combination, ThreadRecord};

const COMBINATION_TEMPLATE: &str = r#"You write questions that members of an online community would post to their peers.

<audience>
{audience}
</audience>

Write exactly one new question shaped by every one of the following dimensions:

{dimensions}

Guidelines:
- Keep the intent and context of the examples but do not reuse their wording
- Match the level of detail shown in the examples
- Write in a natural, peer-to-peer tone
- Vary how the question opens and closes instead of falling back on stock phrases
- Let each dimension show through the content of the question, not only its phrasing

Respond with a JSON object of the form {"question": "<the question>"} and nothing else."#;

const CATEGORY_TEMPLATE: &str = r#"You write questions that members of an online community would post to their peers.

<audience>
{audience}
</audience>

Write exactly one new question that belongs to this category:

Category: {category_dimension}
Instruction: {category_description}
Examples:
{category_examples}

Guidelines:
- Follow the instruction closely
- Keep the spirit of the examples but do not reuse their wording
- Write in a natural, peer-to-peer tone

Respond with a JSON object of the form {"question": "<the question>"} and nothing else."#;

/// Placeholders available for every selection, by suffix
const SELECTION_FIELDS: &[&str] = &["category", "dimension", "description", "examples"];

/// A question prompt with `{placeholder}` slots
///
/// Recognized placeholders:
///
/// - `{audience}`: the configured audience description
/// - `{dimensions}`: every selection rendered as a block
/// - `{<key>_category}`, `{<key>_dimension}`, `{<key>_description}`,
///   `{<key>_examples}`: one selection, addressed by category key
///
/// Substitution is a single pass, so braces inside substituted text are
/// never expanded again. Unknown placeholders are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Create a template from raw text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Built-in template for Cartesian-product combinations
    pub fn combination_default() -> Self {
        Self::new(COMBINATION_TEMPLATE)
    }

    /// Built-in template for category cycling
    pub fn category_default() -> Self {
        Self::new(CATEGORY_TEMPLATE)
    }

    /// Raw template text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder names appearing in the template, sorted
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        scan(&self.text, |name| {
            names.insert(name.to_string());
            None
        });
        names
    }

    /// Check that every placeholder resolves for the given category keys
    pub fn check_keys<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), SynthesizerError> {
        let unknown: Vec<String> = self
            .placeholders()
            .into_iter()
            .filter(|name| !is_known(name, keys))
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(SynthesizerError::Config(format!(
                "Template uses unknown placeholders: {}",
                unknown.join(", ")
            )))
        }
    }

    /// Render the prompt for one combination
    pub fn render(&self, combination: &Combination, audience: &str, example_marker: &str) -> String {
        let mut values: HashMap<String, String> = HashMap::new();
        values.insert("audience".into(), audience.to_string());

        let mut blocks = Vec::with_capacity(combination.selections.len());
        for selection in &combination.selections {
            let dimension = &selection.dimension;
            let examples = dimension.examples_block(example_marker);

            blocks.push(format!(
                "**{} - {}:**\nDescription: {}\nExamples:\n{}",
                selection.category_name, dimension.name, dimension.description, examples
            ));

            let key = &selection.category;
            values.insert(format!("{}_category", key), selection.category_name.clone());
            values.insert(format!("{}_dimension", key), dimension.name.clone());
            values.insert(format!("{}_description", key), dimension.description.clone());
            values.insert(format!("{}_examples", key), examples);
        }
        values.insert("dimensions".into(), blocks.join("\n\n"));

        scan(&self.text, |name| values.get(name).cloned())
    }
}

fn is_known<S: AsRef<str>>(name: &str, keys: &[S]) -> bool {
    if name == "audience" || name == "dimensions" {
        return true;
    }
    keys.iter().any(|key| {
        name.strip_prefix(key.as_ref())
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|field| SELECTION_FIELDS.contains(&field))
    })
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Walk `template`, replacing each `{name}` with `resolve(name)` when it
/// returns a value and copying everything else through
fn scan<F>(template: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('}') {
            Some(end) if is_placeholder_name(&after[..end]) => {
                let name = &after[..end];
                match resolve(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

const DISCOVERY_CONTEXT: &str = "You are analyzing a collection of forum conversations to find the dimensions along which user requests vary.";

const DISCOVERY_GUIDELINES: &str = r#"Identify the key dimensions that characterize these requests. Each dimension is an axis of variation that helps describe what kinds of questions people ask.

Guidelines:
1. Group the dimensions into 4 to 6 categories (for example intent, specificity, subject matter, persona).
2. Give each category 2 to 4 dimensions.
3. For each dimension provide a short name, a one or two sentence description, and 2 or 3 examples.
4. Examples must be complete quotes copied from the conversations above. Never truncate or paraphrase a quote.
5. Prefer dimensions that are distinct from each other and cover the conversations well.

Return the analysis as a JSON object in a ```json fenced block, shaped like this:

```json
{
  "Category Name": [
    {
      "dimension": "Dimension name",
      "description": "What this dimension captures",
      "examples": ["Full quote one", "Full quote two"]
    }
  ]
}
```

After the JSON block, summarize your findings in a few paragraphs inside <summary></summary> tags."#;

/// Builds the single prompt used to discover dimensions from threads
#[derive(Debug, Clone)]
pub struct DiscoveryPromptBuilder<'a> {
    threads: &'a [ThreadRecord],
    context: Option<&'a str>,
}

impl<'a> DiscoveryPromptBuilder<'a> {
    /// Create a builder over the deduplicated threads
    pub fn new(threads: &'a [ThreadRecord]) -> Self {
        Self { threads, context: None }
    }

    /// Describe the community the threads come from
    pub fn with_context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }

    /// Numbered thread bodies, `"{i}. {body}\n\n"` starting at 1
    pub fn conversations(&self) -> String {
        self.threads
            .iter()
            .enumerate()
            .map(|(i, thread)| format!("{}. {}\n\n", i + 1, thread.body))
            .collect()
    }

    /// Build the complete discovery prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(DISCOVERY_CONTEXT);
        prompt.push_str("\n\n");

        if let Some(context) = self.context {
            prompt.push_str("<context>\n");
            prompt.push_str(context);
            prompt.push_str("\n</context>\n\n");
        }

        prompt.push_str("<conversations>\n");
        prompt.push_str(&self.conversations());
        prompt.push_str("</conversations>\n\n");

        prompt.push_str(DISCOVERY_GUIDELINES);
        prompt
    }
}
