use bytes::{BufMut, BytesMut};

/// Unsolicited console output from the running program.
///
/// The text runs to the end of the message or to the first NUL, whichever
/// comes first. Invalid UTF-8 is replaced rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleNotification {
    pub text: String,
}

impl ConsoleNotification {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_slice(self.text.as_bytes());
    }

    pub(crate) fn decode_body(body: &[u8]) -> Self {
        let end = body.iter().position(|&byte| byte == 0).unwrap_or(body.len());
        Self {
            text: String::from_utf8_lossy(&body[..end]).into_owned(),
        }
    }
}
