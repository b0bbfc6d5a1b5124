//! Encoded server responses.

use serde::Serialize;

/// A response, held as its serialized JSON bytes.
///
/// The body is encoded exactly once; the server appends the frame terminator
/// and hands the same buffer to the socket, so nothing is copied on the way
/// out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    json: Vec<u8>,
}

#[derive(Serialize)]
struct ResultBody<T: Serialize> {
    result: T,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: bool,
    result: &'a str,
}

impl Response {
    /// Encode a successful result.
    pub fn result<T: Serialize>(value: T) -> Self {
        match serde_json::to_vec(&ResultBody { result: value }) {
            Ok(json) => Self { json },
            Err(_) => Self::error("response serialization failed"),
        }
    }

    /// Encode a failure with a human-readable message.
    pub fn error(message: &str) -> Self {
        let json = serde_json::to_vec(&ErrorBody {
            error: true,
            result: message,
        })
        .unwrap_or_else(|_| br#"{"error":true,"result":"unreachable code reached"}"#.to_vec());
        Self { json }
    }

    /// The serialized JSON body.
    pub fn as_bytes(&self) -> &[u8] {
        &self.json
    }

    /// Consume the response into a NUL-terminated wire frame.
    pub fn into_frame(mut self) -> Vec<u8> {
        self.json.push(0);
        self.json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_encoding() {
        assert_eq!(Response::result(3_u64).as_bytes(), br#"{"result":3}"#);
        assert_eq!(Response::result(true).as_bytes(), br#"{"result":true}"#);
        assert_eq!(
            Response::result("01").as_bytes(),
            br#"{"result":"01"}"#
        );
        assert_eq!(
            Response::result(vec![1_u64, 2, 3]).as_bytes(),
            br#"{"result":[1,2,3]}"#
        );
    }

    #[test]
    fn test_error_encoding() {
        assert_eq!(
            Response::error("missing null terminator").as_bytes(),
            br#"{"error":true,"result":"missing null terminator"}"#
        );
    }

    #[test]
    fn test_frame_is_nul_terminated() {
        let frame = Response::result(1_u64).into_frame();
        assert_eq!(frame.last(), Some(&0));
    }
}
