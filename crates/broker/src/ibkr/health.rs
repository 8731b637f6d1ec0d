use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::{IbkrError, IbkrGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub authenticated: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    /// Only a 200 from the auth-status endpoint counts as healthy.
    pub fn from_status_code(status_code: u16) -> Self {
        let authenticated = status_code == 200;

        Self {
            status: if authenticated {
                HealthState::Healthy
            } else {
                HealthState::Unhealthy
            },
            status_code: Some(status_code),
            authenticated,
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn unreachable(error: &IbkrError) -> Self {
        Self {
            status: HealthState::Unhealthy,
            status_code: None,
            authenticated: false,
            timestamp: Utc::now(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

impl IbkrGateway {
    pub(crate) async fn fetch_health(&self) -> HealthStatus {
        match self.request_auth_status().await {
            Ok(status_code) => {
                debug!("IBKR auth status answered with {status_code}");
                HealthStatus::from_status_code(status_code)
            }
            Err(e) => {
                warn!("IBKR gateway health check failed: {e}");
                HealthStatus::unreachable(&e)
            }
        }
    }

    async fn request_auth_status(&self) -> Result<u16, IbkrError> {
        let response = self
            .client()
            .get(self.url("/iserver/auth/status"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IbkrError::RequestFailed {
                action: "auth status".to_string(),
                status,
                body,
            });
        }

        Ok(status.as_u16())
    }
}
