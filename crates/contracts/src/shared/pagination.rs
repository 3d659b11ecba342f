use serde::{Deserialize, Serialize};

/// Canonical paginated listing shape.
///
/// Transport envelopes are normalized into this once, at the repository
/// boundary; nothing past that edge sees raw response shapes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u32,
    pub per_page: u32,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn empty(per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            current_page: 1,
            per_page,
            last_page: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty(10)
    }
}
