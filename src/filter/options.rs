use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ApiError;
use crate::utils::num::{lenient_f64, lenient_i64, lenient_string};

/// Marker value of `elevator` meaning "no elevator feature".
pub const ELEVATOR_ABSENT_MARKER: &str = "empty";
/// Marker value of `stateMaloi` meaning "not yet classified".
pub const UNCLASSIFIED_SENTINEL: i64 = -1;

// Wire shape of the list request body. Fields stay untyped so that a value
// of the wrong type drops its clause instead of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionsSerde {
    #[serde(default)]
    pub price_min: Option<Value>,
    #[serde(default)]
    pub price_max: Option<Value>,
    #[serde(default)]
    pub state_maloi: Option<Value>,
    #[serde(default)]
    pub elevator: Option<Value>,
    #[serde(default)]
    pub floor: Option<Value>,
    #[serde(default)]
    pub agent_name: Option<Value>,
    #[serde(default)]
    pub province: Option<Value>,
    #[serde(default)]
    pub accesso_disabili: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    /// `stateMaloi` must be absent.
    Unclassified,
    Is(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElevatorFilter {
    /// No main feature of type `elevator`.
    Absent,
    /// Some main feature carries this compact label.
    Label(String),
}

/// Validated, all-optional search constraints of a list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub state: Option<StateFilter>,
    pub elevator: Option<ElevatorFilter>,
    pub floor: Option<String>,
    pub agent_name: Option<String>,
    pub province: Option<String>,
    pub accesso_disabili: Option<i64>,
}

impl From<FilterOptionsSerde> for FilterOptions {
    fn from(s: FilterOptionsSerde) -> Self {
        let num = |v: Option<Value>| v.as_ref().and_then(lenient_f64);
        let int = |v: Option<Value>| v.as_ref().and_then(lenient_i64);
        let text = |v: Option<Value>| v.as_ref().and_then(lenient_string);
        Self {
            price_min: num(s.price_min),
            price_max: num(s.price_max),
            state: int(s.state_maloi).map(|v| {
                if v == UNCLASSIFIED_SENTINEL { StateFilter::Unclassified } else { StateFilter::Is(v) }
            }),
            elevator: text(s.elevator).map(|v| {
                if v == ELEVATOR_ABSENT_MARKER { ElevatorFilter::Absent } else { ElevatorFilter::Label(v) }
            }),
            floor: text(s.floor),
            agent_name: text(s.agent_name),
            province: text(s.province),
            accesso_disabili: int(s.accesso_disabili),
        }
    }
}

impl FilterOptions {
    /// Parse a request body. `null` is the empty option set; any other
    /// non-object body is rejected.
    pub fn from_json(body: &Value) -> Result<Self, ApiError> {
        let unexpected = match body {
            Value::Null => return Ok(Self::default()),
            Value::Object(_) => {
                let wire: FilterOptionsSerde = serde_json::from_value(body.clone())?;
                return Ok(wire.into());
            }
            Value::Array(_) => Unexpected::Seq,
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::Number(_) => Unexpected::Other("number"),
            Value::String(s) => Unexpected::Str(s),
        };
        // derived struct visitors also accept sequences positionally
        Err(ApiError::Json(serde_json::Error::invalid_type(unexpected, &"a filter options object")))
    }

    /// Parse a request body given as text; blank text is the empty option set.
    pub fn from_json_str(text: &str) -> Result<Self, ApiError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_json(&serde_json::from_str(text)?)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
