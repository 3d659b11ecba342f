use super::navigation::{FilterScope, LevelFilter, ParentScope, StatusFilter};

/// `parent_id` value standing in for an explicit "no parent" scope; the
/// query string cannot carry a literal null.
pub const ROOT_PARENT_SENTINEL: &str = "0";

/// Search and pagination state accompanying the filter scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub per_page: u32,
    pub page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            per_page: 10,
            page: 1,
        }
    }
}

/// Translate the filter scope plus search/pagination into repository query
/// parameters. Pure mapping, cannot fail.
///
/// Parent scope and level filter are mutually exclusive: a defined parent
/// scope wins and the level is never sent.
pub fn to_query_params(scope: FilterScope, query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    let search = query.search.trim();
    if !search.is_empty() {
        params.push(("search", search.to_string()));
    }
    params.push(("per_page", query.per_page.to_string()));
    params.push(("page", query.page.to_string()));

    match scope.parent {
        ParentScope::In(id) => params.push(("parent_id", id.value().to_string())),
        ParentScope::Root => params.push(("parent_id", ROOT_PARENT_SENTINEL.to_string())),
        ParentScope::Unscoped => match scope.level {
            LevelFilter::Level(level) => {
                params.push(("level", level.to_string()));
                if level == 1 {
                    // Pin the root: defends against rows inconsistently
                    // tagged level=1 with a non-null parent.
                    params.push(("parent_id", ROOT_PARENT_SENTINEL.to_string()));
                }
            }
            LevelFilter::All => {}
        },
    }

    match scope.status {
        StatusFilter::Active => params.push(("is_active", "1".to_string())),
        StatusFilter::Inactive => params.push(("is_active", "0".to_string())),
        StatusFilter::All => {}
    }

    params
}
