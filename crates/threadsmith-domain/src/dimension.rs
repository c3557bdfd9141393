//! Dimensions and the categories that group them

/// A named axis of variation used to steer generation
///
/// When dimensions are derived from source material, examples are expected to
/// be verbatim quotes. That is the producer's contract; nothing here checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name (e.g. "Resource Acquisition")
    pub name: String,

    /// What the dimension represents
    pub description: String,

    /// Illustrative examples, in declaration order
    pub examples: Vec<String>,
}

impl Dimension {
    /// Create a new dimension
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        examples: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            examples,
        }
    }

    /// Render the examples one per line, each prefixed with `marker`
    ///
    /// # Examples
    ///
    /// ```
    /// use threadsmith_domain::Dimension;
    ///
    /// let dim = Dimension::new("D", "desc", vec!["a".into(), "b".into()]);
    /// assert_eq!(dim.examples_block("- "), "- a\n- b");
    /// ```
    pub fn examples_block(&self, marker: &str) -> String {
        self.examples
            .iter()
            .map(|example| format!("{}{}", marker, example))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An ordered group of dimensions
///
/// `name` is the category as declared in the dimension document
/// (e.g. "Intent & Task Type"); `key` is the short identifier used in output
/// field names (`intent_dimension`) and CSV headers (`Intent_Dimension`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionCategory {
    /// Category name as declared
    pub name: String,

    /// Short key used in output field names
    pub key: String,

    /// Dimensions, in declaration order
    pub dimensions: Vec<Dimension>,
}

impl DimensionCategory {
    /// Create a category whose key is derived from its name
    pub fn new(name: impl Into<String>, dimensions: Vec<Dimension>) -> Self {
        let name = name.into();
        let key = category_key(&name);
        Self {
            name,
            key,
            dimensions,
        }
    }

    /// Override the derived key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Whether the category has no dimensions
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// A prompt category for the category-cycling variant
///
/// Cycling works over a flat list of categories, each carrying an instruction
/// instead of a dimension list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptCategory {
    /// Key under which the category was declared
    pub key: String,

    /// Human-readable category name
    pub name: String,

    /// Instruction describing what questions in this category ask for
    pub instruction: String,

    /// Example questions
    pub examples: Vec<String>,
}

impl PromptCategory {
    /// View the category as a dimension (instruction becomes the description)
    pub fn as_dimension(&self) -> Dimension {
        Dimension::new(self.name.clone(), self.instruction.clone(), self.examples.clone())
    }
}

/// Derive a short output key from a category name
///
/// Lowercases the name and collapses every run of non-alphanumeric
/// characters into a single underscore.
///
/// # Examples
///
/// ```
/// use threadsmith_domain::category_key;
///
/// assert_eq!(category_key("Intent & Task Type"), "intent_task_type");
/// assert_eq!(category_key("Persona"), "persona");
/// ```
pub fn category_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if key.is_empty() {
        "category".to_string()
    } else {
        key
    }
}

/// Turn an output key into a CSV column label
///
/// Each underscore-separated segment is capitalized.
///
/// # Examples
///
/// ```
/// use threadsmith_domain::column_label;
///
/// assert_eq!(column_label("intent"), "Intent");
/// assert_eq!(column_label("intent_task_type"), "Intent_Task_Type");
/// ```
pub fn column_label(key: &str) -> String {
    key.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}
