//! Cliente HTTP para el backend del marketplace
//!
//! Este módulo contiene el contrato con el backend-as-a-service que maneja
//! identidad (OTP por teléfono) y persistencia de cargas/perfiles, y su
//! implementación HTTP. Esta API nunca toca una base de datos propia:
//! todo registro vive detrás de este contrato.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::models::load::{Load, NewLoad};
use crate::models::user::{DriverSummary, NewProfile, UserProfile, VehicleDetails};

/// Contrato con el backend del marketplace
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Enviar un OTP al teléfono indicado
    async fn send_otp(&self, phone: &str, country_code: &str) -> Result<()>;

    /// Verificar el OTP; devuelve el perfil si el teléfono ya está registrado
    async fn verify_otp(
        &self,
        phone: &str,
        country_code: &str,
        code: &str,
    ) -> Result<Option<UserProfile>>;

    /// Crear un perfil nuevo tras la verificación
    async fn create_profile(&self, profile: NewProfile) -> Result<UserProfile>;

    /// Guardar los detalles de vehículo elegidos por un conductor
    async fn save_vehicle_details(&self, driver_id: Uuid, details: VehicleDetails) -> Result<()>;

    /// Cargas disponibles (las que nadie tomó), más recientes primero
    async fn list_available_loads(&self) -> Result<Vec<Load>>;

    /// Una carga por id
    async fn get_load(&self, load_id: Uuid) -> Result<Option<Load>>;

    /// Publicar una carga
    async fn post_load(&self, owner_id: Uuid, load: NewLoad) -> Result<Load>;

    /// Historial de cargas tomadas por un conductor
    async fn list_driver_history(&self, driver_id: Uuid) -> Result<Vec<Load>>;

    /// Asignar la carga al conductor (hubo acuerdo)
    async fn accept_load(&self, load_id: Uuid, driver_id: Uuid) -> Result<()>;

    /// Devolver la carga al mercado y desligar al conductor
    async fn cancel_load(&self, load_id: Uuid) -> Result<()>;

    /// Conductores disponibles, para el listado de los shippers
    async fn list_available_drivers(&self) -> Result<Vec<DriverSummary>>;
}

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    phone: &'a str,
    country_code: &'a str,
}

#[derive(Debug, Serialize)]
struct OtpVerifyRequest<'a> {
    phone: &'a str,
    country_code: &'a str,
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct OtpVerifyResponse {
    profile: Option<UserProfile>,
}

#[derive(Debug, Serialize)]
struct AcceptLoadRequest {
    driver_id: Uuid,
}

/// Cliente HTTP contra el backend del marketplace
#[derive(Clone)]
pub struct MarketplaceHttpClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl MarketplaceHttpClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(
            config.marketplace_base_url.clone(),
            config.marketplace_api_key.clone(),
            config.upstream_timeout_secs,
        )
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key);
        }
        builder
    }

    async fn expect_success(
        operation: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::error!("❌ Marketplace {} falló con {}: {}", operation, status, body);
        Err(anyhow!("marketplace {} failed with status {}", operation, status))
    }
}

#[async_trait]
impl MarketplaceApi for MarketplaceHttpClient {
    async fn send_otp(&self, phone: &str, country_code: &str) -> Result<()> {
        log::info!("📨 Enviando OTP a {}{}", country_code, phone);

        let response = self
            .request(reqwest::Method::POST, "/auth/otp/send")
            .json(&OtpRequest {
                phone,
                country_code,
            })
            .send()
            .await?;

        Self::expect_success("send_otp", response).await?;
        Ok(())
    }

    async fn verify_otp(
        &self,
        phone: &str,
        country_code: &str,
        code: &str,
    ) -> Result<Option<UserProfile>> {
        let response = self
            .request(reqwest::Method::POST, "/auth/otp/verify")
            .json(&OtpVerifyRequest {
                phone,
                country_code,
                code,
            })
            .send()
            .await?;

        let response = Self::expect_success("verify_otp", response).await?;
        let body: OtpVerifyResponse = response.json().await?;
        Ok(body.profile)
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<UserProfile> {
        let response = self
            .request(reqwest::Method::POST, "/profiles")
            .json(&profile)
            .send()
            .await?;

        let response = Self::expect_success("create_profile", response).await?;
        Ok(response.json().await?)
    }

    async fn save_vehicle_details(&self, driver_id: Uuid, details: VehicleDetails) -> Result<()> {
        let path = format!("/drivers/{}/vehicle", driver_id);
        let response = self
            .request(reqwest::Method::PUT, &path)
            .json(&details)
            .send()
            .await?;

        Self::expect_success("save_vehicle_details", response).await?;
        Ok(())
    }

    async fn list_available_loads(&self) -> Result<Vec<Load>> {
        let response = self
            .request(reqwest::Method::GET, "/loads?status=available")
            .send()
            .await?;

        let response = Self::expect_success("list_available_loads", response).await?;
        Ok(response.json().await?)
    }

    async fn get_load(&self, load_id: Uuid) -> Result<Option<Load>> {
        let path = format!("/loads/{}", load_id);
        let response = self.request(reqwest::Method::GET, &path).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::expect_success("get_load", response).await?;
        Ok(Some(response.json().await?))
    }

    async fn post_load(&self, owner_id: Uuid, load: NewLoad) -> Result<Load> {
        #[derive(Serialize)]
        struct PostLoadBody {
            owner_id: Uuid,
            #[serde(flatten)]
            load: NewLoad,
        }

        let response = self
            .request(reqwest::Method::POST, "/loads")
            .json(&PostLoadBody { owner_id, load })
            .send()
            .await?;

        let response = Self::expect_success("post_load", response).await?;
        Ok(response.json().await?)
    }

    async fn list_driver_history(&self, driver_id: Uuid) -> Result<Vec<Load>> {
        let path = format!("/drivers/{}/loads", driver_id);
        let response = self.request(reqwest::Method::GET, &path).send().await?;

        let response = Self::expect_success("list_driver_history", response).await?;
        Ok(response.json().await?)
    }

    async fn accept_load(&self, load_id: Uuid, driver_id: Uuid) -> Result<()> {
        let path = format!("/loads/{}/accept", load_id);
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&AcceptLoadRequest { driver_id })
            .send()
            .await?;

        Self::expect_success("accept_load", response).await?;
        Ok(())
    }

    async fn cancel_load(&self, load_id: Uuid) -> Result<()> {
        let path = format!("/loads/{}/cancel", load_id);
        let response = self.request(reqwest::Method::POST, &path).send().await?;

        Self::expect_success("cancel_load", response).await?;
        Ok(())
    }

    async fn list_available_drivers(&self) -> Result<Vec<DriverSummary>> {
        let response = self
            .request(reqwest::Method::GET, "/drivers/available")
            .send()
            .await?;

        let response = Self::expect_success("list_available_drivers", response).await?;
        Ok(response.json().await?)
    }
}
