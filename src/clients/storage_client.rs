//! Cliente de almacenamiento de objetos
//!
//! Este módulo sube archivos (imágenes de perfil, documentos de viaje)
//! a un bucket compatible con S3 y devuelve la URL pública durable.

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Archivo recibido por multipart, listo para subir
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Contrato del gateway de almacenamiento
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Subir un archivo bajo el directorio lógico indicado; devuelve la URL
    async fn store(&self, file: UploadFile, dir: &str) -> Result<String, AppError>;

    /// Subir varios archivos concurrentemente, preservando el orden
    async fn store_many(&self, files: Vec<UploadFile>, dir: &str) -> Result<Vec<String>, AppError>;
}

/// Cliente HTTP para un endpoint compatible S3 (MinIO en desarrollo)
#[derive(Clone)]
pub struct StorageClient {
    http_client: reqwest::Client,
    endpoint: String,
    bucket: String,
    public_url: Option<String>,
}

impl StorageClient {
    pub fn new(http_client: reqwest::Client, config: &EnvironmentConfig) -> Self {
        Self {
            http_client,
            endpoint: config.storage_endpoint.trim_end_matches('/').to_string(),
            bucket: config.storage_bucket.clone(),
            public_url: config
                .storage_public_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Clave del objeto: `{dir}/{millis}-{nombre original saneado}`
    fn object_key(filename: &str, dir: &str) -> String {
        let safe_name: String = filename
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let millis = chrono::Utc::now().timestamp_millis();
        format!("{}/{}-{}", dir, millis, safe_name)
    }

    fn public_location(&self, key: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!("{}/{}/{}", self.endpoint, self.bucket, key),
        }
    }
}

#[async_trait]
impl StorageGateway for StorageClient {
    async fn store(&self, file: UploadFile, dir: &str) -> Result<String, AppError> {
        let key = Self::object_key(&file.filename, dir);
        let url = format!("{}/{}/{}", self.endpoint, self.bucket, key);

        let mut request = self.http_client.put(&url).body(file.bytes);
        if let Some(content_type) = &file.content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage unreachable: {}", e)))?;

        if !response.status().is_success() {
            log::warn!("Storage upload failed with status {}", response.status());
            return Err(AppError::Upstream(format!(
                "Storage upload failed: {}",
                response.status()
            )));
        }

        Ok(self.public_location(&key))
    }

    async fn store_many(&self, files: Vec<UploadFile>, dir: &str) -> Result<Vec<String>, AppError> {
        try_join_all(files.into_iter().map(|file| self.store(file, dir))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_sanitizes_filename() {
        let key = StorageClient::object_key("weigh slip (1).pdf", "trip-docs");
        assert!(key.starts_with("trip-docs/"));
        assert!(key.ends_with("-weigh_slip__1_.pdf"));
        assert!(!key.contains(' '));
    }
}
