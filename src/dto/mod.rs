//! DTOs de la API
//!
//! Este módulo contiene los tipos request/response que viajan por HTTP.

pub mod location_dto;
pub mod mill_dto;
pub mod sub_trip_dto;
pub mod trip_dto;
pub mod truck_dto;
pub mod user_dto;

use serde::{Deserialize, Serialize};

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

// Parámetros de listado: búsqueda + paginación, al estilo
// ?search=...&result_per_page=10&current_page=1
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub result_per_page: Option<i64>,
    pub current_page: Option<i64>,
}

impl PageQuery {
    /// LIMIT/OFFSET solo cuando el cliente pide paginación explícita
    pub fn limit_offset(&self) -> Option<(i64, i64)> {
        match (self.result_per_page, self.current_page) {
            (Some(per_page), Some(page)) if per_page > 0 && page > 0 => {
                Some((per_page, (page - 1) * per_page))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_offset() {
        let query = PageQuery {
            search: None,
            status: None,
            role: None,
            result_per_page: Some(10),
            current_page: Some(3),
        };
        assert_eq!(query.limit_offset(), Some((10, 20)));
    }

    #[test]
    fn test_limit_offset_requires_both_params() {
        let query = PageQuery {
            search: None,
            status: None,
            role: None,
            result_per_page: Some(10),
            current_page: None,
        };
        assert_eq!(query.limit_offset(), None);
    }
}
