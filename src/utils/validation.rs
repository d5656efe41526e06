//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidationError;

lazy_static! {
    // dígitos, sin prefijo internacional: el country_code viaja aparte
    static ref MOBILE_NO_RE: Regex = Regex::new(r"^\d{7,12}$").unwrap();
    static ref COUNTRY_CODE_RE: Regex = Regex::new(r"^\d{1,3}$").unwrap();
}

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar formato de número de móvil (solo dígitos, sin country code)
pub fn validate_mobile_no(value: &str) -> Result<(), ValidationError> {
    if !MOBILE_NO_RE.is_match(value) {
        let mut error = ValidationError::new("mobile_no");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar código de país (1-3 dígitos)
pub fn validate_country_code(value: &str) -> Result<(), ValidationError> {
    if !COUNTRY_CODE_RE.is_match(value) {
        let mut error = ValidationError::new("country_code");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, long: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&long) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &long);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar que un valor sea positivo (kilometraje, pesos)
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uuid() {
        let valid_uuid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(valid_uuid).is_ok());

        let invalid_uuid = "invalid-uuid";
        assert!(validate_uuid(invalid_uuid).is_err());
    }

    #[test]
    fn test_validate_mobile_no() {
        assert!(validate_mobile_no("9876543210").is_ok());
        assert!(validate_mobile_no("123").is_err());
        assert!(validate_mobile_no("98765432101234").is_err());
        assert!(validate_mobile_no("98765-43210").is_err());
    }

    #[test]
    fn test_validate_country_code() {
        assert!(validate_country_code("91").is_ok());
        assert!(validate_country_code("1").is_ok());
        assert!(validate_country_code("").is_err());
        assert!(validate_country_code("+91").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(45.0, -75.0).is_ok());
        assert!(validate_coordinates(91.0, -75.0).is_err());
        assert!(validate_coordinates(45.0, -181.0).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(-1).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("haul").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }
}
