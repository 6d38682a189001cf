use crate::repository::RepositoryError;

use super::domain::Space;

/// Storage abstraction for space records.
///
/// `insert` exists for seeding and data load only — spaces are never created
/// by the tenant flow. Each call is atomic at the row level; nothing here
/// spans entities.
pub trait SpaceRepository: Send + Sync {
    fn insert(&self, space: Space) -> Result<(), RepositoryError>;
    fn get(&self, id: &str) -> Result<Option<Space>, RepositoryError>;
    fn update(&self, space: Space) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<Space>, RepositoryError>;
}
