//! Utilidades de validación
//! 
//! Este módulo contiene funciones helper para validación de datos
//! de los requests: teléfonos saudíes, códigos de país y OTP.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Móviles saudíes en formato local: 05XXXXXXXX.
    static ref SAUDI_PHONE_RE: Regex = Regex::new(r"^05\d{8}$").unwrap();
    /// Código de país tipo +966.
    static ref COUNTRY_CODE_RE: Regex = Regex::new(r"^\+\d{1,3}$").unwrap();
    /// Código OTP de 4 a 6 dígitos.
    static ref OTP_CODE_RE: Regex = Regex::new(r"^\d{4,6}$").unwrap();
}

/// Validar un número de móvil saudí en formato local (05XXXXXXXX)
pub fn validate_saudi_phone(value: &str) -> Result<(), ValidationError> {
    if !SAUDI_PHONE_RE.is_match(value) {
        let mut error = ValidationError::new("saudi_phone");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"05XXXXXXXX".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un código de país (+966, +20, ...)
pub fn validate_country_code(value: &str) -> Result<(), ValidationError> {
    if !COUNTRY_CODE_RE.is_match(value) {
        let mut error = ValidationError::new("country_code");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un código OTP (4-6 dígitos)
pub fn validate_otp_code(value: &str) -> Result<(), ValidationError> {
    if !OTP_CODE_RE.is_match(value) {
        let mut error = ValidationError::new("otp_code");
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
