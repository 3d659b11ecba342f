use super::export::{self, ExportRow};
use super::margins::{resolve_margins, CategoryIndex, EffectiveMargins, SystemMargins};
use super::navigation::{FilterScope, LevelFilter, NavigationFrame, Navigator, StatusFilter};
use super::query::ListQuery;
use super::repository::CategoryRepository;
use super::service;
use super::tree::{self, OptionNode};
use contracts::domain::a001_category::{Category, CategoryDraft, CategoryId, CategoryPatch};
use contracts::shared::{CatalogError, Page};

/// Token tying a fetch response to the filter state that requested it.
/// Any state change invalidates outstanding tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Browsing session over the category catalog: holds the navigator, the
/// loaded snapshots and the search/pagination state, and funnels every
/// repository interaction.
///
/// List responses commit through tickets so a slow response for an
/// abandoned filter state can never overwrite newer data.
pub struct CatalogSession<R: CategoryRepository> {
    repo: R,
    navigator: Navigator,
    query: ListQuery,
    defaults: SystemMargins,
    tree: Vec<Category>,
    page: Page<Category>,
    seq: u64,
}

impl<R: CategoryRepository> CatalogSession<R> {
    pub fn new(repo: R, defaults: SystemMargins) -> Self {
        Self {
            repo,
            navigator: Navigator::new(),
            query: ListQuery::default(),
            defaults,
            tree: Vec::new(),
            page: Page::default(),
            seq: 0,
        }
    }

    /// Initial load: tree snapshot plus the first page of the default view.
    pub async fn mount(&mut self) -> Result<(), CatalogError> {
        self.reload_tree().await?;
        self.reload_list().await
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn categories(&self) -> &[Category] {
        &self.page.items
    }

    pub fn page(&self) -> &Page<Category> {
        &self.page
    }

    pub fn tree(&self) -> &[Category] {
        &self.tree
    }

    pub fn breadcrumb(&self) -> &[NavigationFrame] {
        self.navigator.path()
    }

    pub fn scope(&self) -> FilterScope {
        self.navigator.scope()
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn has_children(&self, id: CategoryId) -> bool {
        tree::has_children(&self.page.items, &self.tree, id)
    }

    /// Inheritance-resolved margins for a loaded category. `None` when the
    /// id is in neither the tree snapshot nor the current page.
    pub fn effective_margins(&self, id: CategoryId) -> Option<EffectiveMargins> {
        let index = CategoryIndex::from_parts(&self.tree, &self.page.items);
        let category = index.get(id)?;
        Some(resolve_margins(category, &index, self.defaults))
    }

    pub fn selectable_options(&self) -> Vec<OptionNode> {
        tree::to_selectable_options(&self.tree)
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        export::export_rows(&self.page.items, &self.tree, self.scope())
    }

    pub fn export_csv(&self) -> String {
        export::to_csv(&self.export_rows())
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        export::to_json(&self.export_rows())
    }

    // ------------------------------------------------------------------
    // Filter and navigation mutations. Each one invalidates in-flight list
    // fetches; all but set_page also rewind to the first page.
    // ------------------------------------------------------------------

    pub fn set_level(&mut self, level: LevelFilter) {
        self.navigator.set_level(level);
        self.touch();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.navigator.set_status(status);
        self.touch();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.touch();
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.query.per_page = per_page;
        self.touch();
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.page = page;
        self.seq += 1;
    }

    pub fn drill_into(&mut self, id: CategoryId, display_name: impl Into<String>) {
        self.navigator.drill_into(id, display_name);
        self.touch();
    }

    pub fn jump_to_root(&mut self) {
        self.navigator.jump_to_root();
        self.touch();
    }

    pub fn jump_to_frame(&mut self, index: usize) {
        self.navigator.jump_to_frame(index);
        self.touch();
    }

    fn touch(&mut self) {
        self.query.page = 1;
        self.seq += 1;
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Ticket for the current state. Issuing a new one supersedes any
    /// ticket issued before.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.seq += 1;
        FetchTicket(self.seq)
    }

    /// Commit a list response. Stale tickets are dropped without touching
    /// the loaded page; errors surface to the caller but also leave the
    /// previously loaded page in place.
    pub fn commit_list(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page<Category>, CatalogError>,
    ) -> Result<(), CatalogError> {
        if ticket.0 != self.seq {
            tracing::debug!(
                ticket = ticket.0,
                current = self.seq,
                "dropping stale list response"
            );
            return Ok(());
        }
        match result {
            Ok(page) => {
                self.page = page;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn reload_list(&mut self) -> Result<(), CatalogError> {
        let ticket = self.begin_fetch();
        let scope = self.navigator.scope();
        let result = self.repo.list(scope, &self.query).await;
        self.commit_list(ticket, result)
    }

    pub async fn reload_tree(&mut self) -> Result<(), CatalogError> {
        self.tree = self.repo.tree(true).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Writes. Each successful write refreshes both snapshots so levels,
    // children flags and counts stay consistent with the server.
    // ------------------------------------------------------------------

    pub async fn create_category(
        &mut self,
        draft: CategoryDraft,
    ) -> Result<Category, CatalogError> {
        let created = {
            let index = CategoryIndex::from_parts(&self.tree, &self.page.items);
            service::create(&self.repo, &index, draft).await?
        };
        self.refresh_after_write().await?;
        Ok(created)
    }

    pub async fn update_category(
        &mut self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, CatalogError> {
        let updated = {
            let index = CategoryIndex::from_parts(&self.tree, &self.page.items);
            let current = match index.get(id) {
                Some(category) => category.clone(),
                None => self.repo.get(id).await?,
            };
            service::update(&self.repo, &index, &current, patch).await?
        };
        self.refresh_after_write().await?;
        Ok(updated)
    }

    pub async fn delete_category(&mut self, id: CategoryId) -> Result<(), CatalogError> {
        service::delete(&self.repo, id).await?;
        self.refresh_after_write().await
    }

    /// Both snapshots are refetched even if one of them fails, so a tree
    /// error does not leave the list stale too.
    async fn refresh_after_write(&mut self) -> Result<(), CatalogError> {
        let tree_result = self.reload_tree().await;
        let list_result = self.reload_list().await;
        tree_result.and(list_result)
    }
}
