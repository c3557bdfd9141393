//! Dimension combinator - Cartesian product and category cycling
//!
//! Both modes are pure and deterministic: the same input always yields the
//! same combinations in the same order, and nothing here draws randomness.

use crate::dimension::{Dimension, DimensionCategory, PromptCategory};

/// Selection key used for combinations produced by category cycling
pub const CYCLED_CATEGORY_KEY: &str = "category";

/// One dimension picked from one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Output key of the category the dimension came from
    pub category: String,

    /// Declared name of that category
    pub category_name: String,

    /// The chosen dimension
    pub dimension: Dimension,
}

impl Selection {
    /// Pick `dimension` out of `category`
    pub fn new(category: &DimensionCategory, dimension: &Dimension) -> Self {
        Self {
            category: category.key.clone(),
            category_name: category.name.clone(),
            dimension: dimension.clone(),
        }
    }
}

/// One dimension per category, ordered like the categories were declared
///
/// `index` is the position of the combination in the sequence it was
/// produced in; it is what keeps parallel synthesis output deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    /// Position in the produced sequence
    pub index: usize,

    /// Selected dimensions, one per category
    pub selections: Vec<Selection>,
}

impl Combination {
    /// Look up the selection made for a category key
    pub fn selection(&self, category: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.category == category)
    }

    /// Names of the selected dimensions, in category order
    pub fn dimension_names(&self) -> Vec<&str> {
        self.selections
            .iter()
            .map(|s| s.dimension.name.as_str())
            .collect()
    }
}

/// Number of combinations `combine` will produce
///
/// `None` when the product does not fit in a `usize`.
pub fn combination_count(categories: &[DimensionCategory]) -> Option<usize> {
    if categories.is_empty() {
        return Some(0);
    }
    categories
        .iter()
        .try_fold(1usize, |acc, c| acc.checked_mul(c.dimensions.len()))
}

/// Lazy Cartesian product over a set of categories
///
/// Yields combinations in odometer order without materializing the product,
/// so `take(n)` stays cheap however large the full product is.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    categories: &'a [DimensionCategory],
    /// Current wheel positions, `None` once the odometer has wrapped
    cursor: Option<Vec<usize>>,
    index: usize,
}

impl<'a> Combinations<'a> {
    fn new(categories: &'a [DimensionCategory]) -> Self {
        let empty = categories.is_empty() || categories.iter().any(|c| c.dimensions.is_empty());
        Self {
            categories,
            cursor: (!empty).then(|| vec![0; categories.len()]),
            index: 0,
        }
    }
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        let categories = self.categories;
        let cursor = self.cursor.as_mut()?;

        let selections = categories
            .iter()
            .zip(cursor.iter())
            .map(|(category, &i)| Selection::new(category, &category.dimensions[i]))
            .collect();
        let combination = Combination {
            index: self.index,
            selections,
        };
        self.index += 1;

        if !advance(cursor, categories) {
            self.cursor = None;
        }
        Some(combination)
    }
}

impl std::iter::FusedIterator for Combinations<'_> {}

/// Turn the odometer one step; the last wheel turns fastest.
/// Returns `false` once every wheel has wrapped.
fn advance(cursor: &mut [usize], categories: &[DimensionCategory]) -> bool {
    for wheel in (0..cursor.len()).rev() {
        cursor[wheel] += 1;
        if cursor[wheel] < categories[wheel].dimensions.len() {
            return true;
        }
        cursor[wheel] = 0;
    }
    false
}

/// Iterate the Cartesian product over `categories` lazily
///
/// Same order and indices as `combine`.
///
/// # Examples
///
/// ```
/// use threadsmith_domain::{iter_combinations, Dimension, DimensionCategory};
///
/// let dim = |n: &str| Dimension::new(n, "", vec![]);
/// let categories = vec![
///     DimensionCategory::new("Intent", vec![dim("I1"), dim("I2")]),
///     DimensionCategory::new("Domain", vec![dim("D1"), dim("D2")]),
/// ];
///
/// let first: Vec<_> = iter_combinations(&categories).take(1).collect();
/// assert_eq!(first[0].dimension_names(), vec!["I1", "D1"]);
/// ```
pub fn iter_combinations(categories: &[DimensionCategory]) -> Combinations<'_> {
    Combinations::new(categories)
}

/// Produce the full Cartesian product over `categories`
///
/// Ordering is lexicographic with the last category varying fastest
/// (odometer order). Any empty category, or no categories at all, yields
/// zero combinations.
///
/// # Examples
///
/// ```
/// use threadsmith_domain::{combine, Dimension, DimensionCategory};
///
/// let dim = |n: &str| Dimension::new(n, "", vec![]);
/// let categories = vec![
///     DimensionCategory::new("Intent", vec![dim("I1"), dim("I2")]),
///     DimensionCategory::new("Domain", vec![dim("D1")]),
/// ];
///
/// let combos = combine(&categories);
/// assert_eq!(combos.len(), 2);
/// assert_eq!(combos[0].dimension_names(), vec!["I1", "D1"]);
/// assert_eq!(combos[1].dimension_names(), vec!["I2", "D1"]);
/// ```
pub fn combine(categories: &[DimensionCategory]) -> Vec<Combination> {
    iter_combinations(categories).collect()
}

/// Round-robin over `items` until `target_count` entries are produced
///
/// Returns `items[i % items.len()]` for every `i` in `0..target_count`.
/// An empty input yields an empty output whatever the target.
///
/// # Examples
///
/// ```
/// use threadsmith_domain::cycle;
///
/// assert_eq!(cycle(&['A', 'B', 'C'], 7), vec!['A', 'B', 'C', 'A', 'B', 'C', 'A']);
/// assert_eq!(cycle(&['A', 'B', 'C'], 2), vec!['A', 'B']);
/// ```
pub fn cycle<T: Clone>(items: &[T], target_count: usize) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    (0..target_count)
        .map(|i| items[i % items.len()].clone())
        .collect()
}

/// Cycle prompt categories into single-selection combinations
pub fn cycle_combinations(categories: &[PromptCategory], target_count: usize) -> Vec<Combination> {
    cycle(categories, target_count)
        .into_iter()
        .enumerate()
        .map(|(index, category)| Combination {
            index,
            selections: vec![Selection {
                category: CYCLED_CATEGORY_KEY.to_string(),
                category_name: category.name.clone(),
                dimension: category.as_dimension(),
            }],
        })
        .collect()
}
