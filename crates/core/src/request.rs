//! Webhook request envelope parsing and slot normalization.
//!
//! Two envelope dialects are accepted and detected once, at entry:
//! `{"result": {...}}` (V1) and `{"queryResult": {...}}` (V2). The wrapped
//! object carries `action` and an optional `parameters` mapping whose keys are
//! matched case-insensitively against `author` and `topic`. Anything else is a
//! bad request; there is no best-effort parsing.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::errors::FulfillmentError;
use crate::normalize::lookup_key;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    V1,
    V2,
}

impl Dialect {
    pub fn wrapper_key(self) -> &'static str {
        match self {
            Self::V1 => "result",
            Self::V2 => "queryResult",
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" | "result" => Ok(Self::V1),
            "v2" | "2" | "queryresult" => Ok(Self::V2),
            other => Err(format!("unsupported dialect `{other}` (expected v1|v2)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    GetQuoteResponse,
    GetQuoteEvent,
    GetBioResponse,
    GetBioEvent,
}

impl Action {
    pub const ALL: [Action; 4] =
        [Self::GetQuoteResponse, Self::GetQuoteEvent, Self::GetBioResponse, Self::GetBioEvent];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetQuoteResponse => "get_quote_response",
            Self::GetQuoteEvent => "get_quote_event",
            Self::GetBioResponse => "get_bio_response",
            Self::GetBioEvent => "get_bio_event",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, FulfillmentError> {
        Self::ALL.into_iter().find(|action| action.as_str() == raw).ok_or_else(|| {
            FulfillmentError::bad_request(format!("Request action unrecognized: \"{raw}\""))
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized slots of one request. `author` and `topic` are lookup keys
/// (NFKC + lowercase) or `None` when absent or empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParams {
    pub action: Action,
    pub author: Option<String>,
    pub topic: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookRequest {
    pub dialect: Dialect,
    pub params: QueryParams,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Author,
    Topic,
}

impl Slot {
    fn match_key(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case("author") {
            Some(Self::Author)
        } else if key.eq_ignore_ascii_case("topic") {
            Some(Self::Topic)
        } else {
            None
        }
    }
}

pub fn parse_request(body: &[u8]) -> Result<WebhookRequest, FulfillmentError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_body());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|_| FulfillmentError::bad_request("Request body is not valid JSON."))?;
    extract_request(&value)
}

pub fn extract_request(value: &Value) -> Result<WebhookRequest, FulfillmentError> {
    let body = match value {
        Value::Null => return Err(no_body()),
        Value::Object(body) => body,
        _ => return Err(FulfillmentError::bad_request("Request body must be a JSON object.")),
    };

    let dialect = detect_dialect(body)?;
    let wrapper = match body.get(dialect.wrapper_key()) {
        Some(Value::Object(wrapper)) => wrapper,
        _ => {
            return Err(FulfillmentError::bad_request(format!(
                "\"{}\" must be a JSON object.",
                dialect.wrapper_key()
            )))
        }
    };

    let action = match wrapper.get("action") {
        None | Some(Value::Null) => return Err(no_action()),
        Some(Value::String(action)) if action.trim().is_empty() => return Err(no_action()),
        Some(Value::String(action)) => action.as_str(),
        Some(_) => {
            return Err(FulfillmentError::bad_request("Request \"action\" must be a string."))
        }
    };

    let empty = Map::new();
    let parameters = match wrapper.get("parameters") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(parameters)) => parameters,
        Some(_) => {
            return Err(FulfillmentError::bad_request("\"parameters\" must be a JSON object."))
        }
    };

    let params = extract_params(action, parameters)?;
    Ok(WebhookRequest { dialect, params })
}

/// Validates the action and folds the `author` / `topic` slots.
///
/// Every key must case-insensitively equal one of the two slot names; the
/// first key that does not fails the whole request.
pub fn extract_params(
    action: &str,
    parameters: &Map<String, Value>,
) -> Result<QueryParams, FulfillmentError> {
    let action = Action::parse(action)?;

    let mut author_key: Option<&str> = None;
    let mut topic_key: Option<&str> = None;
    let mut author = None;
    let mut topic = None;

    for (key, value) in parameters {
        let slot = Slot::match_key(key).ok_or_else(|| {
            FulfillmentError::bad_request(format!("Unrecognized parameter in request: {key}"))
        })?;
        let (seen, target) = match slot {
            Slot::Author => (&mut author_key, &mut author),
            Slot::Topic => (&mut topic_key, &mut topic),
        };
        if seen.is_some() {
            return Err(FulfillmentError::bad_request(format!(
                "Duplicate parameter in request: {key}"
            )));
        }
        *seen = Some(key.as_str());
        *target = slot_value(key, value)?;
    }

    Ok(QueryParams { action, author, topic })
}

fn slot_value(key: &str, value: &Value) -> Result<Option<String>, FulfillmentError> {
    let raw = match value {
        Value::Null => return Ok(None),
        Value::String(raw) => raw.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(_) | Value::Object(_) => {
            return Err(FulfillmentError::bad_request(format!(
                "Parameter \"{key}\" must be a string."
            )))
        }
    };

    let folded = lookup_key(&raw);
    Ok((!folded.is_empty()).then_some(folded))
}

fn detect_dialect(body: &Map<String, Value>) -> Result<Dialect, FulfillmentError> {
    let present = |key: &str| body.get(key).is_some_and(|value| !value.is_null());

    if present(Dialect::V2.wrapper_key()) {
        Ok(Dialect::V2)
    } else if present(Dialect::V1.wrapper_key()) {
        Ok(Dialect::V1)
    } else {
        Err(FulfillmentError::bad_request(
            "Neither \"result\" nor \"queryResult\" was provided in the request body.",
        ))
    }
}

fn no_body() -> FulfillmentError {
    FulfillmentError::bad_request("No json body was provided in the request.")
}

fn no_action() -> FulfillmentError {
    FulfillmentError::bad_request("No \"action\" was provided in the request.")
}
