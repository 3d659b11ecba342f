pub mod aggregate;

pub use aggregate::{
    validate_margins, Category, CategoryDraft, CategoryId, CategoryPatch, MAX_LEVEL,
};
