use contracts::domain::a001_category::CategoryId;

/// One drill-down step recorded in the breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationFrame {
    pub category_id: CategoryId,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    All,
    Level(u8),
}

/// Parent constraint of the active scope.
///
/// `Unscoped` means "no parent constraint, level filtering applies";
/// `Root` pins the listing to parent-less categories; `In` scopes it to the
/// direct children of one category. Keeping the three states explicit is
/// what enforces the level/parent mutual exclusion: the translator ignores
/// the level whenever a parent scope is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentScope {
    Unscoped,
    Root,
    In(CategoryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterScope {
    pub level: LevelFilter,
    pub parent: ParentScope,
    pub status: StatusFilter,
}

impl Default for FilterScope {
    /// First load shows only top-level categories.
    fn default() -> Self {
        Self {
            level: LevelFilter::Level(1),
            parent: ParentScope::Unscoped,
            status: StatusFilter::All,
        }
    }
}

impl FilterScope {
    /// Drill navigation active: parent-scoped, level suppressed.
    pub fn is_drilled(&self) -> bool {
        self.parent != ParentScope::Unscoped
    }
}

/// Breadcrumb-driven drill navigation over the category hierarchy.
///
/// All scope mutations go through this type, so the breadcrumb and the
/// filter scope cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    path: Vec<NavigationFrame>,
    scope: FilterScope,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            scope: FilterScope::default(),
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> FilterScope {
        self.scope
    }

    pub fn path(&self) -> &[NavigationFrame] {
        &self.path
    }

    pub fn is_drilled(&self) -> bool {
        !self.path.is_empty()
    }

    /// Flat-mode level selection. While drilled the stored level is inert:
    /// the translator only looks at it once the parent scope is cleared.
    pub fn set_level(&mut self, level: LevelFilter) {
        self.scope.level = level;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.scope.status = status;
    }

    /// Push a breadcrumb frame and scope the listing to the node's children.
    pub fn drill_into(&mut self, category_id: CategoryId, display_name: impl Into<String>) {
        self.path.push(NavigationFrame {
            category_id,
            display_name: display_name.into(),
        });
        self.scope.parent = ParentScope::In(category_id);
        self.scope.level = LevelFilter::All;
    }

    /// Back to the default root view: breadcrumb cleared, level restored
    /// to 1, parent constraint dropped. Status is deliberately preserved.
    pub fn jump_to_root(&mut self) {
        self.path.clear();
        self.scope.parent = ParentScope::Unscoped;
        self.scope.level = LevelFilter::Level(1);
    }

    /// Truncate the breadcrumb to `index` (inclusive) and re-scope to that
    /// frame. Out-of-range indexes are ignored.
    pub fn jump_to_frame(&mut self, index: usize) {
        if index >= self.path.len() {
            return;
        }
        self.path.truncate(index + 1);
        self.scope.parent = ParentScope::In(self.path[index].category_id);
        self.scope.level = LevelFilter::All;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_root_level_one() {
        let nav = Navigator::new();
        assert!(!nav.is_drilled());
        assert_eq!(nav.scope(), FilterScope::default());
        assert_eq!(nav.scope().level, LevelFilter::Level(1));
        assert_eq!(nav.scope().parent, ParentScope::Unscoped);
    }

    #[test]
    fn drilling_pushes_frames_and_scopes_by_parent() {
        let mut nav = Navigator::new();
        nav.drill_into(CategoryId(1), "Electrónica");
        nav.drill_into(CategoryId(2), "Laptops");

        assert_eq!(nav.path().len(), 2);
        assert_eq!(nav.scope().parent, ParentScope::In(CategoryId(2)));
        assert_eq!(nav.scope().level, LevelFilter::All);
        assert!(nav.scope().is_drilled());
    }

    #[test]
    fn jump_to_frame_truncates_and_rescopes() {
        let mut nav = Navigator::new();
        nav.drill_into(CategoryId(1), "Electrónica");
        nav.drill_into(CategoryId(2), "Laptops");
        nav.drill_into(CategoryId(4), "Gamers");

        nav.jump_to_frame(0);
        assert_eq!(nav.path().len(), 1);
        assert_eq!(nav.scope().parent, ParentScope::In(CategoryId(1)));
        assert_eq!(nav.scope().level, LevelFilter::All);
    }

    #[test]
    fn jump_to_frame_ignores_out_of_range() {
        let mut nav = Navigator::new();
        nav.drill_into(CategoryId(1), "Electrónica");
        nav.jump_to_frame(5);
        assert_eq!(nav.path().len(), 1);
        assert_eq!(nav.scope().parent, ParentScope::In(CategoryId(1)));
    }

    #[test]
    fn jump_to_root_restores_the_initial_view_from_any_depth() {
        let mut nav = Navigator::new();
        let initial = nav.scope();

        nav.drill_into(CategoryId(1), "Electrónica");
        nav.jump_to_root();
        assert_eq!(nav.scope(), initial);
        assert!(nav.path().is_empty());

        nav.drill_into(CategoryId(1), "Electrónica");
        nav.drill_into(CategoryId(2), "Laptops");
        nav.jump_to_root();
        assert_eq!(nav.scope(), initial);
        assert_eq!(nav, Navigator::new());
    }

    #[test]
    fn level_changes_while_drilled_stay_inert() {
        let mut nav = Navigator::new();
        nav.drill_into(CategoryId(1), "Electrónica");
        nav.set_level(LevelFilter::Level(2));

        // Scope still reports drill mode; the translator decides precedence.
        assert!(nav.scope().is_drilled());
        assert_eq!(nav.scope().level, LevelFilter::Level(2));
    }
}
