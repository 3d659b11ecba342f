use super::navigation::{FilterScope, LevelFilter, StatusFilter};
use super::tree;
use chrono::{DateTime, Utc};
use contracts::domain::a001_category::{Category, CategoryId};
use serde::Serialize;

/// Display label of a hierarchy level.
pub fn level_label(level: u8) -> &'static str {
    match level {
        1 => "Categoría",
        2 => "Familia",
        3 => "Subfamilia",
        _ => "N/A",
    }
}

/// One exported listing row: the category plus the derived columns the raw
/// aggregate does not carry (level label, resolved parent name).
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub level: u8,
    pub level_name: &'static str,
    pub parent_id: Option<CategoryId>,
    pub parent_name: Option<String>,
    pub description: Option<String>,
    pub products_count: u32,
    pub order: i32,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Parent display name, resolved against the loaded flat list first and the
/// tree snapshot as fallback (the paginated list may not contain the parent).
fn parent_name(category: &Category, flat: &[Category], nested: &[Category]) -> Option<String> {
    let parent_id = category.parent_id?;
    if let Some(parent) = flat.iter().find(|c| c.id == parent_id) {
        return Some(parent.name.clone());
    }
    tree::find_in_tree(nested, parent_id).map(|parent| parent.name.clone())
}

/// Shape the loaded list into export rows, honoring the active status and
/// level filters. The parent scope is not re-applied: a drilled listing is
/// already parent-scoped by the fetch that produced it.
pub fn export_rows(flat: &[Category], nested: &[Category], scope: FilterScope) -> Vec<ExportRow> {
    flat.iter()
        .filter(|cat| match scope.status {
            StatusFilter::Active => cat.is_active,
            StatusFilter::Inactive => !cat.is_active,
            StatusFilter::All => true,
        })
        .filter(|cat| match scope.level {
            LevelFilter::Level(level) => cat.level == level,
            LevelFilter::All => true,
        })
        .map(|cat| ExportRow {
            id: cat.id,
            name: cat.name.clone(),
            slug: cat.slug.clone(),
            level: cat.level,
            level_name: level_label(cat.level),
            parent_id: cat.parent_id,
            parent_name: parent_name(cat, flat, nested),
            description: cat.description.clone(),
            products_count: cat.products_count,
            order: cat.order,
            is_active: cat.is_active,
            created_at: cat.metadata.created_at,
            updated_at: cat.metadata.updated_at,
        })
        .collect()
}

/// Quote a CSV field, doubling embedded quotes.
fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render rows as CSV. Prefixed with a BOM so spreadsheet tools pick up the
/// UTF-8 encoding.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::from("\u{feff}");
    out.push_str("ID,Nombre,Slug,Nivel,Categoría Padre,Productos,Orden,Estado\n");
    for row in rows {
        let line = [
            row.id.to_string(),
            csv_quote(&row.name),
            row.slug.clone().unwrap_or_default(),
            row.level_name.to_string(),
            csv_quote(row.parent_name.as_deref().unwrap_or("-")),
            row.products_count.to_string(),
            row.order.to_string(),
            if row.is_active { "Activa" } else { "Inactiva" }.to_string(),
        ]
        .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Render rows as pretty-printed JSON.
pub fn to_json(rows: &[ExportRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// Download file name carrying the export date, e.g. `categorias_2026-08-30.csv`.
pub fn file_name(extension: &str) -> String {
    format!("categorias_{}.{}", Utc::now().format("%Y-%m-%d"), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat() -> Vec<Category> {
        serde_json::from_value(json!([
            {"id": 1, "name": "Electrónica", "slug": "electronica", "level": 1,
             "products_count": 12},
            {"id": 2, "name": "Laptops", "parent_id": 1, "level": 2,
             "is_active": false},
            {"id": 4, "name": "Gamers", "parent_id": 3, "level": 3}
        ]))
        .unwrap()
    }

    fn nested() -> Vec<Category> {
        // Holds the parent of id 4, which the flat page above does not.
        serde_json::from_value(json!([
            {"id": 1, "name": "Electrónica", "level": 1,
             "children": [
                 {"id": 3, "name": "Audio", "parent_id": 1, "level": 2,
                  "children": [{"id": 4, "name": "Gamers", "parent_id": 3, "level": 3}]}
             ]}
        ]))
        .unwrap()
    }

    #[test]
    fn level_labels_match_the_hierarchy_names() {
        assert_eq!(level_label(1), "Categoría");
        assert_eq!(level_label(2), "Familia");
        assert_eq!(level_label(3), "Subfamilia");
        assert_eq!(level_label(7), "N/A");
    }

    #[test]
    fn rows_resolve_parent_names_from_list_then_tree() {
        let rows = export_rows(&flat(), &nested(), FilterScope {
            level: LevelFilter::All,
            ..FilterScope::default()
        });

        assert_eq!(rows[0].parent_name, None);
        // Parent on the loaded page.
        assert_eq!(rows[1].parent_name.as_deref(), Some("Electrónica"));
        // Parent only present in the tree snapshot.
        assert_eq!(rows[2].parent_name.as_deref(), Some("Audio"));
        assert_eq!(rows[2].level_name, "Subfamilia");
    }

    #[test]
    fn status_and_level_filters_narrow_the_export() {
        let scope = FilterScope {
            level: LevelFilter::All,
            status: StatusFilter::Inactive,
            ..FilterScope::default()
        };
        let rows = export_rows(&flat(), &nested(), scope);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, CategoryId(2));

        let scope = FilterScope {
            level: LevelFilter::Level(3),
            status: StatusFilter::All,
            ..FilterScope::default()
        };
        let rows = export_rows(&flat(), &nested(), scope);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, CategoryId(4));
    }

    #[test]
    fn csv_carries_bom_headers_and_quoted_names() {
        let scope = FilterScope {
            level: LevelFilter::All,
            ..FilterScope::default()
        };
        let csv = to_csv(&export_rows(&flat(), &nested(), scope));

        assert!(csv.starts_with('\u{feff}'));
        let mut lines = csv.trim_start_matches('\u{feff}').lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Nombre,Slug,Nivel,Categoría Padre,Productos,Orden,Estado"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,\"Electrónica\",electronica,Categoría,\"-\",12,0,Activa"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2,\"Laptops\",,Familia,\"Electrónica\",0,0,Inactiva"
        );
    }

    #[test]
    fn csv_escapes_embedded_quotes() {
        assert_eq!(csv_quote("Pinturas \"Premium\""), "\"Pinturas \"\"Premium\"\"\"");
    }

    #[test]
    fn json_rows_expose_the_derived_columns() {
        let scope = FilterScope {
            level: LevelFilter::All,
            ..FilterScope::default()
        };
        let rendered = to_json(&export_rows(&flat(), &nested(), scope)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value[0]["level_name"], "Categoría");
        assert_eq!(value[0]["parent_name"], serde_json::Value::Null);
        assert_eq!(value[2]["parent_name"], "Audio");
        assert_eq!(value[0]["products_count"], 12);
    }

    #[test]
    fn file_name_is_dated() {
        let name = file_name("csv");
        assert!(name.starts_with("categorias_"));
        assert!(name.ends_with(".csv"));
    }
}
