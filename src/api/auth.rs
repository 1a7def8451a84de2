use axum::{
    extract::State,
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::models::user::{NewProfile, UserProfile, UserRole};
use crate::state::AppState;
use crate::utils::errors::{marketplace_error, AppError};
use crate::utils::validation::{validate_country_code, validate_otp_code, validate_saudi_phone};

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(custom = "validate_saudi_phone")]
    pub phone: String,

    #[validate(custom = "validate_country_code")]
    pub country_code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(custom = "validate_saudi_phone")]
    pub phone: String,

    #[validate(custom = "validate_country_code")]
    pub country_code: String,

    #[validate(custom = "validate_otp_code")]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub verified: bool,
    /// None cuando el teléfono no tiene perfil todavía: el cliente debe
    /// llevar al usuario al registro, no tratarlo como error.
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterProfileRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(custom = "validate_saudi_phone")]
    pub phone: String,

    #[validate(custom = "validate_country_code")]
    pub country_code: String,

    pub role: UserRole,
}

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/register", post(register_profile))
}

/// Enviar un OTP al teléfono indicado
pub async fn send_otp(
    State(state): State<AppState>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    request.validate()?;

    state
        .marketplace
        .send_otp(&request.phone, &request.country_code)
        .await
        .map_err(|e| marketplace_error("send_otp", e))?;

    Ok(Json(json!({
        "success": true,
        "message": "OTP sent"
    })))
}

/// Verificar el OTP y devolver el perfil si existe
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    request.validate()?;

    let profile = state
        .marketplace
        .verify_otp(&request.phone, &request.country_code, &request.code)
        .await
        .map_err(|e| marketplace_error("verify_otp", e))?;

    match &profile {
        Some(p) => log::info!("✅ OTP verificado para {} ({:?})", p.phone, p.role),
        None => log::info!("ℹ️ OTP verificado, teléfono sin perfil: {}", request.phone),
    }

    Ok(Json(VerifyOtpResponse {
        verified: true,
        profile,
    }))
}

/// Crear el perfil tras la verificación (onboarding por rol)
pub async fn register_profile(
    State(state): State<AppState>,
    Json(request): Json<RegisterProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    request.validate()?;

    let profile = state
        .marketplace
        .create_profile(NewProfile {
            full_name: request.full_name,
            phone: request.phone,
            country_code: request.country_code,
            role: request.role,
        })
        .await
        .map_err(|e| marketplace_error("create_profile", e))?;

    log::info!("✅ Perfil creado: {} ({:?})", profile.id, profile.role);
    Ok(Json(profile))
}
