//! Parameter bags and the few locally validated values.
//!
//! Endpoint payloads are open string-keyed maps of JSON values; the service
//! owns their schema. Only `device_type` and purchase entries are checked
//! before a request is sent.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Call parameters merged into every request payload.
pub type Params = Map<String, Value>;

/// Converts a JSON object into `Params`.
///
/// Any other value (array, string, number, ...) is discarded whole and
/// yields an empty bag, so the request goes out with only the default
/// fields. Build a `Params` directly when the input is not known to be an
/// object.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Numeric device platform identifier as the service defines it
/// (0 = iOS, 1 = Android, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeviceType(i64);

impl DeviceType {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Accepts integers, finite floats (truncated), booleans and strings
    /// holding an integer. Values outside the `i64` range are rejected.
    pub fn coerce(value: &Value) -> Result<Self, ApiError> {
        let coerced = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .map(f64::trunc)
                    .filter(|f| (i64::MIN as f64..i64::MAX as f64).contains(f))
                    .map(|f| f as i64)
            }),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        coerced
            .map(Self)
            .ok_or_else(|| ApiError::invalid_argument("device_type must be an integer."))
    }
}

/// Fields every purchase entry must carry with a non-empty value.
pub const PURCHASE_REQUIRED_FIELDS: [&str; 3] = ["sku", "amount", "iso"];

/// Rejects the first purchase missing a required field.
pub fn validate_purchases(purchases: &[Params]) -> Result<(), ApiError> {
    for purchase in purchases {
        let complete = PURCHASE_REQUIRED_FIELDS
            .iter()
            .all(|field| purchase.get(*field).is_some_and(is_truthy));
        if !complete {
            let rendered = serde_json::to_string(purchase).map_err(ApiError::encode)?;
            return Err(ApiError::invalid_argument(format!(
                "A purchase is missing a required field: {rendered}"
            )));
        }
    }
    Ok(())
}

/// `null`, `false`, zero and empty strings/arrays/objects count as empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
