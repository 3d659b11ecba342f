use contracts::domain::a001_category::{Category, CategoryId};
use std::collections::{HashMap, HashSet};

/// Where an effective margin value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginSource {
    Own,
    Inherited,
    SystemDefault,
}

/// Margins that actually apply to a category after inheritance. Derived
/// fresh on every read, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveMargins {
    pub min: f64,
    pub normal: f64,
    pub min_source: MarginSource,
    pub normal_source: MarginSource,
}

/// System-wide fallback when neither the category nor any ancestor sets a
/// margin. Zero unless the configuration supplies one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemMargins {
    pub min: f64,
    pub normal: f64,
}

/// Id lookup over a loaded snapshot, used to walk parent chains.
pub struct CategoryIndex<'a> {
    by_id: HashMap<CategoryId, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    pub fn from_flat(categories: &'a [Category]) -> Self {
        let mut index = Self {
            by_id: HashMap::with_capacity(categories.len()),
        };
        for category in categories {
            index.by_id.insert(category.id, category);
        }
        index
    }

    pub fn from_tree(tree: &'a [Category]) -> Self {
        let mut index = Self { by_id: HashMap::new() };
        index.insert_subtree(tree);
        index
    }

    /// Tree snapshot first, flat page rows filling any gaps (the active-only
    /// tree can miss inactive parents that the flat listing still shows).
    pub fn from_parts(tree: &'a [Category], flat: &'a [Category]) -> Self {
        let mut index = Self::from_tree(tree);
        for category in flat {
            index.by_id.entry(category.id).or_insert(category);
        }
        index
    }

    fn insert_subtree(&mut self, nodes: &'a [Category]) {
        for node in nodes {
            self.by_id.insert(node.id, node);
            self.insert_subtree(&node.children);
        }
    }

    pub fn get(&self, id: CategoryId) -> Option<&'a Category> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Resolve the effective margins for `category`.
///
/// `min` and `normal` are resolved independently: an own value (> 0) wins,
/// otherwise the closest ancestor with a value supplies it, otherwise the
/// system default applies.
pub fn resolve_margins(
    category: &Category,
    index: &CategoryIndex<'_>,
    defaults: SystemMargins,
) -> EffectiveMargins {
    let (min, min_source) =
        resolve_field(category, index, |c| c.min_margin_percentage, defaults.min);
    let (normal, normal_source) = resolve_field(
        category,
        index,
        |c| c.normal_margin_percentage,
        defaults.normal,
    );
    EffectiveMargins {
        min,
        normal,
        min_source,
        normal_source,
    }
}

fn resolve_field(
    category: &Category,
    index: &CategoryIndex<'_>,
    field: impl Fn(&Category) -> f64,
    default: f64,
) -> (f64, MarginSource) {
    let own = field(category);
    if own > 0.0 {
        return (own, MarginSource::Own);
    }

    // Visited set keeps a corrupt parent chain from looping.
    let mut visited: HashSet<CategoryId> = HashSet::new();
    visited.insert(category.id);
    let mut next = category.parent_id;
    while let Some(parent_id) = next {
        if !visited.insert(parent_id) {
            tracing::warn!(category = %category.id, cycle_at = %parent_id, "cyclic parent chain");
            break;
        }
        let Some(parent) = index.get(parent_id) else {
            break;
        };
        let value = field(parent);
        if value > 0.0 {
            return (value, MarginSource::Inherited);
        }
        next = parent.parent_id;
    }

    (default, MarginSource::SystemDefault)
}
