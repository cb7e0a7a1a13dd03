//! JSON bodies exchanged with the settlement service.
//!
//! Field names and result codes follow the backend's Spanish API:
//!
//! ```text
//! POST /api/blackjack/jugar        {"userId": 7, "resultado": "ganado", "apuesta": 25.0}
//!                               -> {"fondos": 1025.0}
//! GET  /api/usuarios/{id}/fondos -> {"fondos": 1000.0}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::Outcome;

/// Identifier of a user on the settlement service.
///
/// The backend hands out numeric ids, but string ids are accepted so the
/// client does not need to know how accounts are keyed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl UserId {
    /// Parse an id, preferring the numeric form.
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<u64>() {
            Ok(n) => UserId::Number(n),
            Err(_) => UserId::Text(s.trim().to_string()),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        UserId::Number(n)
    }
}

/// Round result as the service spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCode {
    #[serde(rename = "ganado")]
    Won,
    #[serde(rename = "perdido")]
    Lost,
    #[serde(rename = "empate")]
    Tied,
}

impl From<Outcome> for ResultCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => ResultCode::Won,
            Outcome::Lost => ResultCode::Lost,
            Outcome::Tied => ResultCode::Tied,
        }
    }
}

impl From<ResultCode> for Outcome {
    fn from(code: ResultCode) -> Self {
        match code {
            ResultCode::Won => Outcome::Won,
            ResultCode::Lost => Outcome::Lost,
            ResultCode::Tied => Outcome::Tied,
        }
    }
}

/// Report of one resolved round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "resultado")]
    pub result: ResultCode,
    #[serde(rename = "apuesta")]
    pub wager: f64,
}

impl SettlementRequest {
    /// Build a request for a resolved round.
    pub fn new(user_id: UserId, outcome: Outcome, wager: f64) -> Self {
        Self {
            user_id,
            result: outcome.into(),
            wager,
        }
    }
}

/// The user's balance after the service applied a request, or on query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundsResponse {
    #[serde(rename = "fondos")]
    pub balance: f64,
}

/// Error body some endpoints return alongside a failure status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = SettlementRequest::new(UserId::Number(7), Outcome::Won, 25.5);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"userId": 7, "resultado": "ganado", "apuesta": 25.5})
        );

        let lost = SettlementRequest::new(UserId::Text("ana".into()), Outcome::Lost, 1.0);
        let value = serde_json::to_value(&lost).unwrap();
        assert_eq!(value["userId"], "ana");
        assert_eq!(value["resultado"], "perdido");

        let tied = SettlementRequest::new(UserId::Number(1), Outcome::Tied, 3.0);
        assert_eq!(serde_json::to_value(&tied).unwrap()["resultado"], "empate");
    }

    #[test]
    fn test_funds_response_parses() {
        let funds: FundsResponse = serde_json::from_str(r#"{"fondos": 975.25}"#).unwrap();
        assert_eq!(funds.balance, 975.25);

        // Extra fields from the backend are ignored
        let funds: FundsResponse =
            serde_json::from_str(r#"{"fondos": 10, "message": "ok"}"#).unwrap();
        assert_eq!(funds.balance, 10.0);
    }

    #[test]
    fn test_error_body_optional_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message": "Fondos insuficientes"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Fondos insuficientes"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
    }

    #[test]
    fn test_user_id_parse() {
        assert_eq!(UserId::parse("42"), UserId::Number(42));
        assert_eq!(UserId::parse(" 42 "), UserId::Number(42));
        assert_eq!(UserId::parse("abc-1"), UserId::Text("abc-1".to_string()));
        assert_eq!(UserId::parse("abc-1").to_string(), "abc-1");
    }

    #[test]
    fn test_result_code_round_trip_through_outcome() {
        for outcome in [Outcome::Won, Outcome::Lost, Outcome::Tied] {
            assert_eq!(Outcome::from(ResultCode::from(outcome)), outcome);
        }
    }
}
