//! Request body extraction
//!
//! The landing page posts HTML forms while API clients send JSON, so bodies are
//! decoded according to their content type. Rejections surface as 400s.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Body decoded from JSON or `application/x-www-form-urlencoded`
#[derive(Debug)]
pub struct Payload<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |ct| ct.starts_with("application/x-www-form-urlencoded"))
}

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(Payload(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(Payload(value))
        }
    }
}

/// A number as sent by JSON clients, or as text from a form field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    /// JSON number
    Number(f64),
    /// Form field or quoted JSON value
    Text(String),
}

impl NumberInput {
    /// Numeric value, if the text form parses as one
    ///
    /// Returns `Ok(None)` for blank text so callers can treat it as missing.
    pub fn value(&self) -> Result<Option<f64>, String> {
        match self {
            NumberInput::Number(n) => Ok(Some(*n)),
            NumberInput::Text(text) if text.trim().is_empty() => Ok(None),
            NumberInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        name: Option<String>,
        amount: Option<NumberInput>,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body() {
        let req = request("application/json", r#"{"name":"run","amount":30}"#);
        let Payload(probe) = Payload::<Probe>::from_request(req, &()).await.unwrap();
        assert_eq!(probe.name.as_deref(), Some("run"));
        assert_eq!(probe.amount, Some(NumberInput::Number(30.0)));
    }

    #[tokio::test]
    async fn test_form_body() {
        let req = request("application/x-www-form-urlencoded", "name=run&amount=45");
        let Payload(probe) = Payload::<Probe>::from_request(req, &()).await.unwrap();
        assert_eq!(probe.name.as_deref(), Some("run"));
        assert_eq!(probe.amount.unwrap().value(), Ok(Some(45.0)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let req = request("application/json", "{not json");
        let err = Payload::<Probe>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_number_input_values() {
        assert_eq!(NumberInput::Number(1.5).value(), Ok(Some(1.5)));
        assert_eq!(NumberInput::Text(" 20 ".to_string()).value(), Ok(Some(20.0)));
        assert_eq!(NumberInput::Text("".to_string()).value(), Ok(None));
        assert_eq!(
            NumberInput::Text("abc".to_string()).value(),
            Err("abc".to_string())
        );
    }
}
