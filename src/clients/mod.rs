//! Clientes de servicios externos
//!
//! Este módulo contiene los clientes HTTP hacia los colaboradores
//! externos: el proveedor de OTP y el almacenamiento de objetos.

pub mod otp_client;
pub mod storage_client;

pub use otp_client::{OtpClient, OtpGateway};
pub use storage_client::{StorageClient, StorageGateway, UploadFile};
