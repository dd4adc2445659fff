//! Tagged port values and input resolution
//!
//! Values travel between nodes as `{ "type": "string", "value": "..." }`.
//! A node's parameters come either from its static data or, when the node
//! data has the matching `use*Input` flag set, from a graph input port.
//! [`get_input_or_data`] implements that rule; [`coerce`] reads a value
//! that must be present.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{NodeEngineError, Result};
use crate::types::{PortDataType, PortId};

/// Values received on input ports, keyed by port id
pub type Inputs = HashMap<PortId, DataValue>;

/// Values produced on output ports, keyed by port id
pub type Outputs = HashMap<PortId, DataValue>;

/// A value carried by a port, tagged with its data type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DataValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl DataValue {
    /// Data type tag of this value
    pub fn data_type(&self) -> PortDataType {
        match self {
            DataValue::String(_) => PortDataType::String,
            DataValue::Number(_) => PortDataType::Number,
            DataValue::Boolean(_) => PortDataType::Boolean,
        }
    }

    /// Build a value from JSON handed over by a host.
    ///
    /// Accepts the tagged form as well as bare JSON primitives. Returns
    /// `None` for null, arrays and untagged objects.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(DataValue::String(s.clone())),
            serde_json::Value::Bool(b) => Some(DataValue::Boolean(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(DataValue::Number),
            serde_json::Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }

    /// Tagged JSON form of this value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DataValue::String(s) => serde_json::json!({"type": "string", "value": s}),
            DataValue::Number(n) => serde_json::json!({"type": "number", "value": n}),
            DataValue::Boolean(b) => serde_json::json!({"type": "boolean", "value": b}),
        }
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(value)
    }
}

/// Conversion from a port value into a concrete parameter type
pub trait FromDataValue: Sized {
    /// Port type this parameter is declared as
    const DATA_TYPE: PortDataType;

    /// Convert, returning `None` when the value has the wrong type
    fn from_data_value(value: &DataValue) -> Option<Self>;
}

impl FromDataValue for String {
    const DATA_TYPE: PortDataType = PortDataType::String;

    fn from_data_value(value: &DataValue) -> Option<Self> {
        match value {
            DataValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromDataValue for f64 {
    const DATA_TYPE: PortDataType = PortDataType::Number;

    fn from_data_value(value: &DataValue) -> Option<Self> {
        match value {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromDataValue for u32 {
    const DATA_TYPE: PortDataType = PortDataType::Number;

    fn from_data_value(value: &DataValue) -> Option<Self> {
        match value {
            DataValue::Number(n)
                if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 =>
            {
                Some(*n as u32)
            }
            _ => None,
        }
    }
}

impl FromDataValue for bool {
    const DATA_TYPE: PortDataType = PortDataType::Boolean;

    fn from_data_value(value: &DataValue) -> Option<Self> {
        match value {
            DataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Read a value that must be present on `port` with type `T`.
///
/// Absence and a type mismatch are both reported as `InvalidInputType`.
pub fn coerce<T: FromDataValue>(inputs: &Inputs, port: &str) -> Result<T> {
    inputs
        .get(port)
        .and_then(T::from_data_value)
        .ok_or_else(|| NodeEngineError::invalid_type(port, T::DATA_TYPE.as_str()))
}

/// Resolve a parameter from its input port or from static node data.
///
/// When `use_input` is set and the port carries a value, that value wins
/// and must convert to `T`. Otherwise the static `data` value is returned.
pub fn get_input_or_data<T: FromDataValue>(
    use_input: bool,
    data: Option<T>,
    inputs: &Inputs,
    port: &str,
) -> Result<Option<T>> {
    if !use_input {
        return Ok(data);
    }

    match inputs.get(port) {
        Some(value) => T::from_data_value(value)
            .map(Some)
            .ok_or_else(|| NodeEngineError::invalid_type(port, T::DATA_TYPE.as_str())),
        None => Ok(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(entries: &[(&str, DataValue)]) -> Inputs {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_value(DataValue::from("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "string", "value": "hi"}));
        assert_eq!(DataValue::from("hi").to_json(), json);
    }

    #[test]
    fn test_from_json_accepts_tagged_and_bare() {
        let tagged = serde_json::json!({"type": "number", "value": 0.7});
        assert_eq!(DataValue::from_json(&tagged), Some(DataValue::Number(0.7)));
        assert_eq!(
            DataValue::from_json(&serde_json::json!("text")),
            Some(DataValue::String("text".to_string()))
        );
        assert_eq!(DataValue::from_json(&serde_json::json!(true)), Some(DataValue::Boolean(true)));
        assert_eq!(DataValue::from_json(&serde_json::Value::Null), None);
        assert_eq!(DataValue::from_json(&serde_json::json!({"foo": 1})), None);
    }

    #[test]
    fn test_coerce_string() {
        let inputs = inputs(&[("prompt", DataValue::from("Hello"))]);
        let prompt: String = coerce(&inputs, "prompt").unwrap();
        assert_eq!(prompt, "Hello");
    }

    #[test]
    fn test_coerce_missing_is_type_error() {
        let err = coerce::<String>(&Inputs::new(), "prompt").unwrap_err();
        assert!(matches!(
            err,
            NodeEngineError::InvalidInputType { ref port, ref expected }
                if port == "prompt" && expected == "string"
        ));
    }

    #[test]
    fn test_coerce_wrong_type() {
        let inputs = inputs(&[("prompt", DataValue::Number(3.0))]);
        assert!(coerce::<String>(&inputs, "prompt").is_err());
    }

    #[test]
    fn test_input_wins_when_toggled() {
        let inputs = inputs(&[("temperature", DataValue::Number(0.9))]);
        let value = get_input_or_data(true, Some(0.5), &inputs, "temperature").unwrap();
        assert_eq!(value, Some(0.9));
    }

    #[test]
    fn test_data_used_when_not_toggled() {
        let inputs = inputs(&[("temperature", DataValue::Number(0.9))]);
        let value = get_input_or_data(false, Some(0.5), &inputs, "temperature").unwrap();
        assert_eq!(value, Some(0.5));
    }

    #[test]
    fn test_data_used_when_toggled_input_absent() {
        let value =
            get_input_or_data::<u32>(true, Some(1024), &Inputs::new(), "maxNewTokens").unwrap();
        assert_eq!(value, Some(1024));
    }

    #[test]
    fn test_toggled_input_type_mismatch() {
        let inputs = inputs(&[("doSample", DataValue::from("yes"))]);
        let err = get_input_or_data::<bool>(true, Some(true), &inputs, "doSample").unwrap_err();
        assert!(err.to_string().contains("doSample"));
    }

    #[test]
    fn test_u32_rejects_fractional() {
        assert_eq!(u32::from_data_value(&DataValue::Number(12.0)), Some(12));
        assert_eq!(u32::from_data_value(&DataValue::Number(12.5)), None);
        assert_eq!(u32::from_data_value(&DataValue::Number(-1.0)), None);
    }
}
