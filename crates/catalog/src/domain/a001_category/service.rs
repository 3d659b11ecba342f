use super::margins::CategoryIndex;
use super::repository::CategoryRepository;
use contracts::domain::a001_category::{
    validate_margins, Category, CategoryDraft, CategoryId, CategoryPatch, MAX_LEVEL,
};
use contracts::shared::CatalogError;

/// Level a category gets under the chosen parent.
pub fn level_for_parent(parent: Option<&Category>) -> u8 {
    parent.map(|p| p.level + 1).unwrap_or(1)
}

fn resolve_parent<'a>(
    index: &CategoryIndex<'a>,
    parent_id: Option<CategoryId>,
) -> Result<Option<&'a Category>, CatalogError> {
    match parent_id {
        None => Ok(None),
        Some(id) => index
            .get(id)
            .map(Some)
            .ok_or_else(|| CatalogError::NotFound(format!("categoría padre {id}"))),
    }
}

fn check_level_cap(level: u8) -> Result<(), CatalogError> {
    if level > MAX_LEVEL {
        return Err(CatalogError::validation(
            "parent_id",
            "No se pueden crear más de 3 niveles de categorías",
        ));
    }
    Ok(())
}

/// Validate a draft and create the category. The level is computed from the
/// chosen parent here, at write time; nothing is sent to the repository if
/// any rule fails.
pub async fn create<R: CategoryRepository>(
    repo: &R,
    index: &CategoryIndex<'_>,
    mut draft: CategoryDraft,
) -> Result<Category, CatalogError> {
    Category::validate_fields(
        &draft.name,
        draft.min_margin_percentage,
        draft.normal_margin_percentage,
    )?;

    let parent = resolve_parent(index, draft.parent_id)?;
    let level = level_for_parent(parent);
    check_level_cap(level)?;
    draft.level = Some(level);

    tracing::info!(name = %draft.name, level, "creating category");
    repo.create(&draft).await
}

/// Validate a partial update against the current aggregate and apply it.
/// Only supplied fields are validated and sent; the level is recomputed
/// only when the parent actually changes.
pub async fn update<R: CategoryRepository>(
    repo: &R,
    index: &CategoryIndex<'_>,
    current: &Category,
    mut patch: CategoryPatch,
) -> Result<Category, CatalogError> {
    if patch.is_empty() {
        tracing::debug!(id = %current.id, "empty patch, nothing to update");
        return Ok(current.clone());
    }

    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(CatalogError::validation("name", "El nombre es requerido"));
        }
    }

    // Cross-field margin rule runs against the merged view, so setting only
    // one margin still cannot undercut the other.
    let min = patch
        .min_margin_percentage
        .unwrap_or(current.min_margin_percentage);
    let normal = patch
        .normal_margin_percentage
        .unwrap_or(current.normal_margin_percentage);
    validate_margins(min, normal)?;

    // The level is never caller-supplied: it is derived from the parent
    // here, or left untouched when the parent does not change.
    if patch.parent_id.is_none() && patch.level.take().is_some() {
        tracing::debug!(id = %current.id, "discarding caller-supplied level");
    }

    if let Some(new_parent) = patch.parent_id {
        if new_parent == Some(current.id) {
            return Err(CatalogError::validation(
                "parent_id",
                "Una categoría no puede ser su propio padre",
            ));
        }
        let parent = resolve_parent(index, new_parent)?;
        let level = level_for_parent(parent);
        check_level_cap(level)?;
        patch.level = Some(level);
    }

    tracing::info!(id = %current.id, "updating category");
    repo.update(current.id, &patch).await
}

pub async fn delete<R: CategoryRepository>(
    repo: &R,
    id: CategoryId,
) -> Result<(), CatalogError> {
    tracing::info!(%id, "deleting category");
    repo.delete(id).await
}
