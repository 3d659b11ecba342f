use crate::domain::common::{AggregateId, EntityMetadata};
use crate::shared::CatalogError;
use serde::{Deserialize, Deserializer, Serialize};

/// Deepest level the hierarchy allows: category, family, subfamily.
pub const MAX_LEVEL: u8 = 3;

// ============================================================================
// ID Type
// ============================================================================
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CategoryId(pub i64);

impl CategoryId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for CategoryId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(CategoryId::new)
            .map_err(|e| format!("Invalid category id: {}", e))
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Aggregate
// ============================================================================
/// A catalog category.
///
/// The same type covers both representations returned by the repository:
/// the flat paginated listing (empty `children`) and the nested tree.
/// A margin of `0` means "not set, inherit from the ancestor chain".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    pub level: u8,
    #[serde(default)]
    pub min_margin_percentage: f64,
    #[serde(default)]
    pub normal_margin_percentage: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
    /// Products attached directly to this category.
    #[serde(default)]
    pub products_count: u32,
    /// Products including every descendant category.
    #[serde(default)]
    pub total_products: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

fn default_true() -> bool {
    true
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn has_own_min_margin(&self) -> bool {
        self.min_margin_percentage > 0.0
    }

    pub fn has_own_normal_margin(&self) -> bool {
        self.normal_margin_percentage > 0.0
    }

    /// Field-level checks every write must pass. Cross-aggregate rules
    /// (level computation against the chosen parent) live in the catalog
    /// service, which can see the ancestor chain.
    pub fn validate_fields(
        name: &str,
        min_margin: f64,
        normal_margin: f64,
    ) -> Result<(), CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::validation("name", "El nombre es requerido"));
        }
        validate_margins(min_margin, normal_margin)
    }
}

/// Margin rules: both percentages in [0, 100]; once both are explicitly set
/// (> 0), the normal margin cannot undercut the minimum. A zero keeps the
/// field in "inherit" mode and is never cross-checked.
pub fn validate_margins(min_margin: f64, normal_margin: f64) -> Result<(), CatalogError> {
    if !(0.0..=100.0).contains(&min_margin) {
        return Err(CatalogError::validation(
            "min_margin_percentage",
            "El margen debe estar entre 0 y 100",
        ));
    }
    if !(0.0..=100.0).contains(&normal_margin) {
        return Err(CatalogError::validation(
            "normal_margin_percentage",
            "El margen debe estar entre 0 y 100",
        ));
    }
    if min_margin > 0.0 && normal_margin > 0.0 && normal_margin < min_margin {
        return Err(CatalogError::validation(
            "normal_margin_percentage",
            "El margen normal debe ser mayor o igual al mínimo",
        ));
    }
    Ok(())
}

// ============================================================================
// DTOs
// ============================================================================
/// Payload for creating a category. `level` is filled in by the catalog
/// service after it resolves the chosen parent; callers leave it `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default)]
    pub min_margin_percentage: f64,
    #[serde(default)]
    pub normal_margin_percentage: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
}

impl Default for CategoryDraft {
    /// New categories start active, everything else unset.
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: None,
            description: None,
            parent_id: None,
            level: None,
            min_margin_percentage: 0.0,
            normal_margin_percentage: 0.0,
            is_active: true,
            order: 0,
        }
    }
}

/// Partial update: only populated fields are validated and sent, so an
/// untouched form field is never rewritten server-side.
///
/// `parent_id` is double-optional: `None` leaves the parent alone,
/// `Some(None)` explicitly moves the category to the root.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<CategoryId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_margin_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_margin_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.parent_id.is_none()
            && self.level.is_none()
            && self.min_margin_percentage.is_none()
            && self.normal_margin_percentage.is_none()
            && self.is_active.is_none()
            && self.order.is_none()
    }
}

/// A present-but-null field deserializes to `Some(None)` instead of being
/// collapsed into "absent".
fn deserialize_explicit_null<'de, D>(
    deserializer: D,
) -> Result<Option<Option<CategoryId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<CategoryId>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_category_deserializes_without_children_or_timestamps() {
        let cat: Category = serde_json::from_value(json!({
            "id": 7,
            "name": "Electrónica",
            "parent_id": null,
            "level": 1
        }))
        .unwrap();

        assert_eq!(cat.id, CategoryId(7));
        assert!(cat.is_root());
        assert!(cat.children.is_empty());
        assert!(cat.is_active);
        assert_eq!(cat.min_margin_percentage, 0.0);
        assert!(cat.metadata.created_at.is_none());
    }

    #[test]
    fn tree_category_deserializes_nested_children() {
        let cat: Category = serde_json::from_value(json!({
            "id": 1,
            "name": "Electrónica",
            "level": 1,
            "children": [
                {"id": 2, "name": "Laptops", "parent_id": 1, "level": 2}
            ]
        }))
        .unwrap();

        assert_eq!(cat.children.len(), 1);
        assert_eq!(cat.children[0].parent_id, Some(CategoryId(1)));
    }

    #[test]
    fn margin_validation_rejects_out_of_range() {
        let err = validate_margins(120.0, 0.0).unwrap_err();
        assert_eq!(err.field(), Some("min_margin_percentage"));

        let err = validate_margins(0.0, -1.0).unwrap_err();
        assert_eq!(err.field(), Some("normal_margin_percentage"));
    }

    #[test]
    fn margin_validation_rejects_normal_below_min_only_when_both_set() {
        let err = validate_margins(30.0, 20.0).unwrap_err();
        assert_eq!(err.field(), Some("normal_margin_percentage"));

        // A zero means "inherit", so the cross-field rule does not apply.
        assert!(validate_margins(30.0, 0.0).is_ok());
        assert!(validate_margins(0.0, 20.0).is_ok());
    }

    #[test]
    fn patch_serializes_only_populated_fields() {
        let patch = CategoryPatch {
            name: Some("Laptops".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({"name": "Laptops"}));
    }

    #[test]
    fn patch_serializes_explicit_null_parent() {
        let patch = CategoryPatch {
            parent_id: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({"parent_id": null}));
    }
}
