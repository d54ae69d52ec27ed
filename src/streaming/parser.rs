//! Incremental JSON object framer for streaming responses
//!
//! The generate endpoint sends one JSON object per line, but the HTTP body
//! arrives in arbitrary chunks: an object can be split across chunks and one
//! chunk can hold several objects. The parser buffers bytes and hands back one
//! complete object text at a time using bracket matching.
//!
//! - Buffer: 1MB maximum per pending object
//! - Whitespace between objects is skipped
//! - Anything else between objects is a decode error

use crate::errors::{NinoError, Result};

/// Maximum size of a single pending object (1MB)
pub const MAX_BUFFER_SIZE: usize = 1_048_576;

/// Incremental JSON framer
#[derive(Debug)]
pub struct JsonParser {
    /// Accumulation buffer
    buffer: Vec<u8>,

    /// Maximum size of one pending object
    max_buffer_size: usize,

    /// Bracket-matching progress through the pending object
    scan: ScanState,
}

/// Where bracket matching stopped, so a new chunk only scans new bytes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ScanState {
    /// Next byte to look at; zero until the pending object's `{` is seen
    pos: usize,
    depth: i32,
    in_string: bool,
    escape_next: bool,
}

impl JsonParser {
    /// Create new JSON parser with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }

    /// Create parser with custom buffer capacity
    pub fn with_capacity(max_buffer_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_buffer_size,
            scan: ScanState::default(),
        }
    }

    /// Append a chunk of the body
    pub fn add_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Take the next complete object out of the buffer, if there is one
    pub fn next_json(&mut self) -> Result<Option<String>> {
        if self.scan.pos == 0 {
            match self.buffer.iter().position(|b| !b.is_ascii_whitespace()) {
                Some(start) => {
                    self.buffer.drain(..start);
                }
                None => {
                    self.buffer.clear();
                    return Ok(None);
                }
            }

            if self.buffer[0] != b'{' {
                return Err(NinoError::Decode(format!(
                    "invalid character '{}' looking for beginning of object",
                    self.buffer[0].escape_ascii()
                )));
            }
        }

        match self.find_object_end() {
            Some(end) => {
                let json_bytes: Vec<u8> = self.buffer.drain(..=end).collect();
                self.scan = ScanState::default();
                String::from_utf8(json_bytes)
                    .map(Some)
                    .map_err(|e| NinoError::Decode(format!("invalid UTF-8 in response: {}", e)))
            }
            None if self.buffer.len() > self.max_buffer_size => {
                Err(NinoError::Decode(format!(
                    "Buffer overflow: pending object of {} bytes exceeds maximum {}",
                    self.buffer.len(),
                    self.max_buffer_size
                )))
            }
            None => Ok(None),
        }
    }

    /// Signal end of input; leftover bytes mean the last object was cut off
    pub fn finish(&mut self) -> Result<()> {
        self.scan = ScanState::default();
        if self.buffer.iter().all(|b| b.is_ascii_whitespace()) {
            self.buffer.clear();
            return Ok(());
        }

        let pending = self.buffer.len();
        self.buffer.clear();
        Err(NinoError::Decode(format!(
            "unexpected end of stream with {} bytes of incomplete JSON",
            pending
        )))
    }

    /// Bracket matching over the pending object, which starts at index 0
    ///
    /// ```text
    /// depth ← 0
    /// for each byte bᵢ outside string literals:
    ///     '{' → depth ← depth + 1
    ///     '}' → depth ← depth - 1; if depth = 0 return i
    /// return None   // object not complete yet
    /// ```
    ///
    /// Resumes from where the previous call stopped.
    fn find_object_end(&mut self) -> Option<usize> {
        let scan = &mut self.scan;

        for (i, &byte) in self.buffer.iter().enumerate().skip(scan.pos) {
            if scan.escape_next {
                scan.escape_next = false;
                continue;
            }

            if scan.in_string {
                match byte {
                    b'\\' => scan.escape_next = true,
                    b'"' => scan.in_string = false,
                    _ => {}
                }
                continue;
            }

            match byte {
                b'"' => scan.in_string = true,
                b'{' => scan.depth += 1,
                b'}' => {
                    scan.depth -= 1;
                    if scan.depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }

        scan.pos = self.buffer.len();
        None
    }

    /// Get current buffer size
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_json_extraction() {
        let mut parser = JsonParser::new();

        let json = r#"{"response": "Hello", "done": false}"#;
        parser.add_bytes(json.as_bytes());

        assert_eq!(parser.next_json().unwrap().as_deref(), Some(json));
        assert!(parser.is_empty());
    }

    #[test]
    fn test_incremental_json_extraction() {
        let mut parser = JsonParser::new();

        parser.add_bytes(br#"{"response":"#);
        assert!(parser.next_json().unwrap().is_none());

        parser.add_bytes(br#" "Hel"#);
        assert!(parser.next_json().unwrap().is_none());

        parser.add_bytes(br#"lo", "done": true}"#);
        assert_eq!(
            parser.next_json().unwrap().as_deref(),
            Some(r#"{"response": "Hello", "done": true}"#)
        );
    }

    #[test]
    fn test_braces_in_strings() {
        let mut parser = JsonParser::new();

        let json = r#"{"response": "fn main() { println!(\"}\"); }"}"#;
        parser.add_bytes(json.as_bytes());

        assert_eq!(parser.next_json().unwrap().as_deref(), Some(json));
    }

    #[test]
    fn test_escaped_backslash_before_quote() {
        let mut parser = JsonParser::new();

        let json = r#"{"response": "C:\\"}"#;
        parser.add_bytes(json.as_bytes());

        assert_eq!(parser.next_json().unwrap().as_deref(), Some(json));
    }

    #[test]
    fn test_newline_delimited_objects() {
        let mut parser = JsonParser::new();

        parser.add_bytes(b"{\"a\":1}\n{\"b\":2}\n");

        assert_eq!(parser.next_json().unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(parser.next_json().unwrap().as_deref(), Some(r#"{"b":2}"#));
        assert!(parser.next_json().unwrap().is_none());
        assert!(parser.finish().is_ok());
    }

    #[test]
    fn test_garbage_between_objects() {
        let mut parser = JsonParser::new();

        parser.add_bytes(b"{\"a\":1}\nnot json");

        assert!(parser.next_json().unwrap().is_some());
        let err = parser.next_json().unwrap_err();
        assert!(matches!(err, NinoError::Decode(_)));
    }

    #[test]
    fn test_truncated_object_at_finish() {
        let mut parser = JsonParser::new();

        parser.add_bytes(br#"{"response": "World", "done": true"#);
        assert!(parser.next_json().unwrap().is_none());

        assert!(matches!(parser.finish(), Err(NinoError::Decode(_))));
        assert!(parser.is_empty());
    }

    #[test]
    fn test_whitespace_only_finish() {
        let mut parser = JsonParser::new();

        parser.add_bytes(b"  \r\n\t");
        assert!(parser.next_json().unwrap().is_none());
        assert!(parser.finish().is_ok());
        assert_eq!(parser.buffer_size(), 0);
    }

    #[test]
    fn test_string_state_survives_chunk_boundary() {
        let mut parser = JsonParser::new();

        parser.add_bytes(br#"{"response":"a"#);
        assert!(parser.next_json().unwrap().is_none());
        parser.add_bytes(br#"}b\"#);
        assert!(parser.next_json().unwrap().is_none());
        parser.add_bytes(br#""}"}"#);

        assert_eq!(
            parser.next_json().unwrap().as_deref(),
            Some(r#"{"response":"a}b\"}"}"#)
        );
        assert!(parser.is_empty());
    }

    #[test]
    fn test_resumes_scan_where_it_stopped() {
        let mut parser = JsonParser::new();

        parser.add_bytes(b"  {\"a\":");
        assert!(parser.next_json().unwrap().is_none());
        assert_eq!(parser.scan.pos, parser.buffer_size());

        parser.add_bytes(b"{\"b\":1}");
        assert!(parser.next_json().unwrap().is_none());
        assert_eq!(parser.scan.pos, parser.buffer_size());
        assert_eq!(parser.scan.depth, 1);

        parser.add_bytes(b"}\n{\"c\":2}");
        assert_eq!(parser.next_json().unwrap().as_deref(), Some(r#"{"a":{"b":1}}"#));
        assert_eq!(parser.next_json().unwrap().as_deref(), Some(r#"{"c":2}"#));
        assert_eq!(parser.scan, ScanState::default());
    }

    #[test]
    fn test_buffer_overflow() {
        let mut parser = JsonParser::with_capacity(100);

        let mut data = b"{\"response\":\"".to_vec();
        data.extend(vec![b'a'; 150]);
        parser.add_bytes(&data);

        assert!(matches!(parser.next_json(), Err(NinoError::Decode(_))));
    }
}
