//! Routers de la API
//!
//! Un router por recurso, anidados bajo /api desde main.rs.

pub mod admin_routes;
pub mod location_routes;
pub mod mill_routes;
pub mod trip_routes;
pub mod truck_routes;
pub mod user_routes;

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::clients::UploadFile;
use crate::utils::errors::AppError;

const MAX_FILES: usize = 5;

/// Leer un form multipart completo: campos de texto por nombre + archivos.
/// Cualquier parte con filename cuenta como archivo.
pub(crate) async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Vec<UploadFile>), AppError> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(filename) = field.file_name() {
            if files.len() >= MAX_FILES {
                return Err(AppError::BadRequest("File limit reached".to_string()));
            }

            let filename = filename.to_string();
            let content_type = field.content_type().map(|ct| ct.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid file upload: {}", e)))?
                .to_vec();

            files.push(UploadFile { filename, content_type, bytes });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, files))
}
