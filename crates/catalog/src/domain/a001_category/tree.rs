use contracts::domain::a001_category::{Category, CategoryId, MAX_LEVEL};

/// One entry of a cascading selection control, built from the category tree.
///
/// A leaf carries an empty `children` vector; builders never emit an
/// empty-but-present child list distinct from "no children", so pickers
/// cannot show a dead expansion arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionNode {
    pub value: CategoryId,
    pub label: String,
    pub children: Vec<OptionNode>,
}

impl OptionNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Map the nested category tree to cascader options, preserving order.
pub fn to_selectable_options(tree: &[Category]) -> Vec<OptionNode> {
    tree.iter()
        .map(|node| OptionNode {
            value: node.id,
            label: node.name.clone(),
            children: to_selectable_options(&node.children),
        })
        .collect()
}

/// Chain of option values from a root down to `target`, pre-order, first
/// match wins. `None` when the id is not present in the options.
pub fn resolve_path_to_id(
    options: &[OptionNode],
    target: CategoryId,
) -> Option<Vec<CategoryId>> {
    fn walk(items: &[OptionNode], target: CategoryId, path: &mut Vec<CategoryId>) -> bool {
        for item in items {
            path.push(item.value);
            if item.value == target {
                return true;
            }
            if walk(&item.children, target, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    if walk(options, target, &mut path) {
        Some(path)
    } else {
        None
    }
}

/// Locate a node anywhere in the nested tree.
pub fn find_in_tree(tree: &[Category], id: CategoryId) -> Option<&Category> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_tree(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Direct children of `id` according to the tree snapshot.
pub fn children_of(tree: &[Category], id: CategoryId) -> &[Category] {
    find_in_tree(tree, id)
        .map(|node| node.children.as_slice())
        .unwrap_or(&[])
}

/// Whether the category has children, checked against two sources: the
/// currently loaded flat page first, then the full tree snapshot. The flat
/// list is paginated and filtered, so a child can easily fall outside it;
/// the tree is the authoritative fallback.
pub fn has_children(flat: &[Category], tree: &[Category], id: CategoryId) -> bool {
    if flat.iter().any(|c| c.parent_id == Some(id)) {
        return true;
    }
    find_in_tree(tree, id)
        .map(|node| !node.children.is_empty())
        .unwrap_or(false)
}

/// Options for the parent picker in the category form.
///
/// Only levels 1 and 2 are offered (a parent at level 3 would push the child
/// past the level cap), and the category being edited is excluded so it
/// cannot be chosen as its own ancestor.
pub fn parent_picker_options(
    all: &[Category],
    editing: Option<CategoryId>,
) -> Vec<OptionNode> {
    debug_assert!(MAX_LEVEL == 3);

    let mut options = Vec::new();
    for cat in all.iter().filter(|c| c.level == 1) {
        if editing == Some(cat.id) {
            continue;
        }
        let children = all
            .iter()
            .filter(|c| c.level == 2 && c.parent_id == Some(cat.id))
            .filter(|c| editing != Some(c.id))
            .map(|c| OptionNode {
                value: c.id,
                label: c.name.clone(),
                children: Vec::new(),
            })
            .collect();
        options.push(OptionNode {
            value: cat.id,
            label: cat.name.clone(),
            children,
        });
    }
    options
}
