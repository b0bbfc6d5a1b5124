//! Decoded client requests.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{Result, RpcError};

/// A decoded request, borrowing from the receive buffer.
///
/// The method name and the parameter array are located during the initial
/// parse; individual parameters stay raw JSON until a handler asks for them
/// with a concrete type, mirroring how handlers declare one type per
/// parameter position.
#[derive(Debug, Deserialize)]
pub struct Request<'a> {
    #[serde(borrow)]
    method: &'a str,
    #[serde(borrow)]
    parameters: Vec<&'a RawValue>,
}

impl<'a> Request<'a> {
    /// Parse a request body (without its NUL terminator).
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(|e| RpcError::MalformedRequest(e.to_string()))
    }

    /// The requested method name.
    pub fn method(&self) -> &'a str {
        self.method
    }

    /// Number of parameters supplied.
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// The packed method attribute byte: name length in the low five bits,
    /// parameter count in the high three.
    pub fn method_attr(&self) -> Result<u8> {
        let len = self.method.len();
        let count = self.parameters.len();
        if len > 0x1F || count > 0x07 {
            return Err(RpcError::BadValues);
        }
        Ok(len as u8 | (count as u8) << 5)
    }

    /// Decode the parameter at `index` as `T`.
    pub fn parameter<T: Deserialize<'a>>(&self, index: usize) -> Result<T> {
        let raw = self
            .parameters
            .get(index)
            .ok_or(RpcError::BadParameter(index))?;
        serde_json::from_str(raw.get()).map_err(|_| RpcError::BadParameter(index))
    }

    /// Decode the parameter at `index` as a delimiter byte.
    pub fn delimiter(&self, index: usize) -> Result<u8> {
        let value: u64 = self.parameter(index)?;
        u8::try_from(value).map_err(|_| RpcError::BadParameter(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_accessors() {
        let payload = br#"{"method":"compile_macro","parameters":[3,"chpext","h 0\nm 0\n",10]}"#;
        let request = Request::parse(payload).unwrap();
        assert_eq!(request.method(), "compile_macro");
        assert_eq!(request.parameter_count(), 4);
        assert_eq!(request.parameter::<u64>(0).unwrap(), 3);
        assert_eq!(request.parameter::<String>(1).unwrap(), "chpext");
        assert_eq!(request.parameter::<String>(2).unwrap(), "h 0\nm 0\n");
        assert_eq!(request.delimiter(3).unwrap(), b'\n');
    }

    #[test]
    fn test_method_attr() {
        let payload = br#"{"method":"create_state","parameters":[1,"chpext","init 1\n",10]}"#;
        let request = Request::parse(payload).unwrap();
        assert_eq!(request.method_attr().unwrap(), 12 | (4 << 5));
    }

    #[test]
    fn test_method_attr_rejects_oversized() {
        let payload = br#"{"method":"m","parameters":[1,2,3,4,5,6,7,8]}"#;
        let request = Request::parse(payload).unwrap();
        assert!(matches!(request.method_attr(), Err(RpcError::BadValues)));

        let long = format!(
            r#"{{"method":"{}","parameters":[]}}"#,
            "x".repeat(32)
        );
        let request = Request::parse(long.as_bytes()).unwrap();
        assert!(matches!(request.method_attr(), Err(RpcError::BadValues)));
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(Request::parse(br#"{"method":"x"}"#).is_err());
        assert!(Request::parse(br#"{"parameters":[]}"#).is_err());
        assert!(Request::parse(b"not json").is_err());
    }

    #[test]
    fn test_typed_parameter_mismatch() {
        let payload = br#"{"method":"m","parameters":["text"]}"#;
        let request = Request::parse(payload).unwrap();
        assert!(matches!(
            request.parameter::<u64>(0),
            Err(RpcError::BadParameter(0))
        ));
        assert!(matches!(
            request.parameter::<u64>(5),
            Err(RpcError::BadParameter(5))
        ));
    }

    #[test]
    fn test_array_parameter() {
        let payload = br#"{"method":"m","parameters":[[0.5,1.5,2.0],[1,2],[true,false]]}"#;
        let request = Request::parse(payload).unwrap();
        assert_eq!(
            request.parameter::<Vec<f64>>(0).unwrap(),
            vec![0.5, 1.5, 2.0]
        );
        assert_eq!(request.parameter::<Vec<u64>>(1).unwrap(), vec![1, 2]);
        assert_eq!(
            request.parameter::<Vec<bool>>(2).unwrap(),
            vec![true, false]
        );
    }
}
