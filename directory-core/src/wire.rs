//! JSON envelopes shared by the server and its clients.

use serde::{Deserialize, Serialize};

use crate::company::Company;
use crate::engine::{CompanyPage, Pagination};

/// `{ "success": true, "data": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ "success": true, "data": [...], "pagination": {...} }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompaniesResponse {
    pub success: bool,
    pub data: Vec<Company>,
    pub pagination: Pagination,
}

impl From<CompanyPage> for CompaniesResponse {
    fn from(page: CompanyPage) -> Self {
        Self {
            success: true,
            data: page.data,
            pagination: page.pagination,
        }
    }
}

impl From<CompaniesResponse> for CompanyPage {
    fn from(resp: CompaniesResponse) -> Self {
        Self {
            data: resp.data,
            pagination: resp.pagination,
        }
    }
}

/// `{ "success": false, "message": ..., "error": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
