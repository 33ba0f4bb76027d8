//! DTOs for cache maintenance endpoints.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub removed: usize,
}
