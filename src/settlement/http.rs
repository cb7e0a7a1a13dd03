//! Settlement over the backend's REST API.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::wire::{ErrorBody, FundsResponse, SettlementRequest, UserId};
use super::{Settlement, SettlementError};

/// Blocking HTTP client for the settlement service.
#[derive(Debug, Clone)]
pub struct HttpSettlement {
    client: Client,
    base_url: String,
}

impl HttpSettlement {
    /// Create a client for `base_url` (e.g. `http://localhost:3001`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SettlementError> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn settle_url(&self) -> String {
        format!("{}/api/blackjack/jugar", self.base_url)
    }

    fn funds_url(&self, user: &UserId) -> String {
        format!("{}/api/usuarios/{}/fondos", self.base_url, user)
    }
}

impl Settlement for HttpSettlement {
    fn balance(&mut self, user: &UserId) -> Result<f64, SettlementError> {
        let url = self.funds_url(user);
        debug!(%url, "fetching balance");
        let funds: FundsResponse = read_json(self.client.get(&url).send()?)?;
        Ok(funds.balance)
    }

    fn settle(&mut self, request: &SettlementRequest) -> Result<FundsResponse, SettlementError> {
        let url = self.settle_url();
        debug!(%url, user = %request.user_id, result = ?request.result, wager = request.wager, "settling");
        let funds: FundsResponse = read_json(self.client.post(&url).json(request).send()?)?;
        info!(user = %request.user_id, balance = funds.balance, "settled");
        Ok(funds)
    }
}

fn normalize_base_url(base_url: &str) -> Result<String, SettlementError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(SettlementError::InvalidUrl(base_url.to_string()));
    }
    Ok(trimmed.to_string())
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SettlementError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }
    let body = response.text().unwrap_or_default();
    Err(SettlementError::Rejected {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// Prefer the server's `message` field, then the raw body, then the reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
    {
        return message;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let http = HttpSettlement::new("http://localhost:3001/", Duration::from_secs(1)).unwrap();
        assert_eq!(http.base_url(), "http://localhost:3001");
        assert_eq!(http.settle_url(), "http://localhost:3001/api/blackjack/jugar");
        assert_eq!(
            http.funds_url(&UserId::Number(7)),
            "http://localhost:3001/api/usuarios/7/fondos"
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = HttpSettlement::new("localhost:3001", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SettlementError::InvalidUrl(_)));
    }

    #[test]
    fn test_error_message_precedence() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"Apuesta inválida"}"#),
            "Apuesta inválida"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            "boom"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }
}
