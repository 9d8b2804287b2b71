//! Branch service

use crate::db::{Repository, SharedStore, StorageError};
use crate::models::{Branch, CreateBranchRequest, UpdateBranchRequest};

/// CRUD operations over the branches collection
#[derive(Clone)]
pub struct BranchService {
    repo: Repository<Branch>,
}

impl BranchService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn list(&self) -> Result<Vec<Branch>, StorageError> {
        self.repo.get_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Branch>, StorageError> {
        self.repo.get_by_id(id).await
    }

    pub async fn create(&self, req: &CreateBranchRequest) -> Result<Branch, StorageError> {
        self.repo.create(req).await
    }

    /// Merge `patch` into the branch; `None` if it does not exist
    pub async fn update(
        &self,
        id: &str,
        patch: &UpdateBranchRequest,
    ) -> Result<Option<Branch>, StorageError> {
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        self.repo.delete(id).await
    }
}
