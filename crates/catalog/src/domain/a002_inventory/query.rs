use contracts::domain::a001_category::CategoryId;

/// Sort options the inventory browser exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Latest stock movement first.
    #[default]
    Recent,
    NameAsc,
    NameDesc,
}

/// Stock buckets the inventory listing can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockBucket {
    #[default]
    All,
    Low,
    Available,
    Out,
}

/// UI-facing inventory filter state. `category: None` means all categories;
/// a drilled cascader selection carries the deepest selected id.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryFilter {
    pub sort: SortOrder,
    pub category: Option<CategoryId>,
    pub stock: StockBucket,
    pub warehouse: Option<i64>,
    pub search: String,
    pub per_page: u32,
    pub page: u32,
}

impl Default for InventoryFilter {
    fn default() -> Self {
        Self {
            sort: SortOrder::Recent,
            category: None,
            stock: StockBucket::All,
            warehouse: None,
            search: String::new(),
            per_page: 10,
            page: 1,
        }
    }
}

/// Translate inventory filter state into repository query parameters.
/// Pure mapping, cannot fail.
pub fn to_query_params(filter: &InventoryFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    match filter.sort {
        SortOrder::Recent => {
            params.push(("sort_by", "last_movement_at".to_string()));
            params.push(("sort_order", "desc".to_string()));
        }
        SortOrder::NameAsc => {
            params.push(("sort_by", "name".to_string()));
            params.push(("sort_order", "asc".to_string()));
        }
        SortOrder::NameDesc => {
            params.push(("sort_by", "name".to_string()));
            params.push(("sort_order", "desc".to_string()));
        }
    }

    if let Some(category) = filter.category {
        params.push(("category_id", category.value().to_string()));
    }

    match filter.stock {
        StockBucket::Low => params.push(("low_stock", "true".to_string())),
        StockBucket::Available => params.push(("with_stock", "true".to_string())),
        StockBucket::Out => params.push(("out_of_stock", "true".to_string())),
        StockBucket::All => {}
    }

    if let Some(warehouse) = filter.warehouse {
        params.push(("warehouse_id", warehouse.to_string()));
    }

    let search = filter.search.trim();
    if !search.is_empty() {
        params.push(("search", search.to_string()));
    }
    params.push(("per_page", filter.per_page.to_string()));
    params.push(("page", filter.page.to_string()));

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn default_filter_sorts_by_latest_movement() {
        let params = to_query_params(&InventoryFilter::default());

        assert_eq!(value_of(&params, "sort_by"), Some("last_movement_at"));
        assert_eq!(value_of(&params, "sort_order"), Some("desc"));
        assert_eq!(value_of(&params, "category_id"), None);
        assert_eq!(value_of(&params, "low_stock"), None);
    }

    #[test]
    fn name_sorts_map_to_direction() {
        let filter = InventoryFilter {
            sort: SortOrder::NameAsc,
            ..Default::default()
        };
        let params = to_query_params(&filter);
        assert_eq!(value_of(&params, "sort_by"), Some("name"));
        assert_eq!(value_of(&params, "sort_order"), Some("asc"));
    }

    #[test]
    fn stock_buckets_map_to_their_flags() {
        for (bucket, key) in [
            (StockBucket::Low, "low_stock"),
            (StockBucket::Available, "with_stock"),
            (StockBucket::Out, "out_of_stock"),
        ] {
            let filter = InventoryFilter {
                stock: bucket,
                ..Default::default()
            };
            let params = to_query_params(&filter);
            assert_eq!(value_of(&params, key), Some("true"));
        }
    }

    #[test]
    fn category_and_warehouse_scope_are_forwarded() {
        let filter = InventoryFilter {
            category: Some(CategoryId(42)),
            warehouse: Some(3),
            search: " taladro ".into(),
            ..Default::default()
        };
        let params = to_query_params(&filter);

        assert_eq!(value_of(&params, "category_id"), Some("42"));
        assert_eq!(value_of(&params, "warehouse_id"), Some("3"));
        assert_eq!(value_of(&params, "search"), Some("taladro"));
    }
}
