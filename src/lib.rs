//! Employee Directory Library
//!
//! REST API over bank branches and their employees, backed by a document store.

use std::time::Instant;

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use api::create_router;
pub use config::AppConfig;
pub use db::{DocumentStore, SharedStore};
use services::{BranchService, EmployeeService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Document store backing every service
    pub store: SharedStore,
    pub branches: BranchService,
    pub employees: EmployeeService,
    /// Process start, for the health endpoint's uptime
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        Self {
            config,
            branches: BranchService::new(store.clone()),
            employees: EmployeeService::new(store.clone()),
            store,
            started_at: Instant::now(),
        }
    }
}
