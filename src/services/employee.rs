//! Employee service
//!
//! Besides plain CRUD this provides the by-branch and by-department listings.
//! Both read the whole collection and filter in memory on every call; there is
//! no index behind them, so cost grows linearly with the number of employees.

use crate::db::{Repository, SharedStore, StorageError};
use crate::models::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};

/// CRUD operations and derived listings over the employees collection
#[derive(Clone)]
pub struct EmployeeService {
    repo: Repository<Employee>,
}

impl EmployeeService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn list(&self) -> Result<Vec<Employee>, StorageError> {
        self.repo.get_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Employee>, StorageError> {
        self.repo.get_by_id(id).await
    }

    pub async fn create(&self, req: &CreateEmployeeRequest) -> Result<Employee, StorageError> {
        self.repo.create(req).await
    }

    /// Merge `patch` into the employee; `None` if it does not exist
    pub async fn update(
        &self,
        id: &str,
        patch: &UpdateEmployeeRequest,
    ) -> Result<Option<Employee>, StorageError> {
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        self.repo.delete(id).await
    }

    /// Employees whose `branch_id` equals `branch_id` once both are trimmed
    pub async fn list_by_branch(&self, branch_id: &str) -> Result<Vec<Employee>, StorageError> {
        let wanted = branch_id.trim();
        let all = self.repo.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|e| e.branch_id.trim() == wanted)
            .collect())
    }

    /// Employees in `department`, compared case-insensitively
    pub async fn list_by_department(
        &self,
        department: &str,
    ) -> Result<Vec<Employee>, StorageError> {
        let wanted = department.trim().to_lowercase();
        let all = self.repo.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|e| e.department.trim().to_lowercase() == wanted)
            .collect())
    }
}
