use bytes::BytesMut;
use cvsum_core::StreamEvent;

const DEFAULT_EVENT_KIND: &str = "message";

/// Incremental `text/event-stream` decoder.
///
/// Bytes may arrive split at arbitrary points; complete events are returned as
/// soon as their terminating blank line has been seen. Lines end in LF or CRLF.
/// An event still being assembled when the stream ends is never returned.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    event_kind: Option<String>,
    data: String,
    has_data: bool,
    seen_first_line: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let mut line = self.buffer.split_to(newline + 1);
            line.truncate(newline);
            if line.last() == Some(&b'\r') {
                line.truncate(newline - 1);
            }

            let text = String::from_utf8_lossy(&line).into_owned();
            let text = if self.seen_first_line {
                text.as_str()
            } else {
                self.seen_first_line = true;
                text.strip_prefix('\u{feff}').unwrap_or(&text)
            };
            if let Some(event) = self.process_line(text) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<StreamEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event_kind = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            // `id` and `retry` only matter for reconnection, which the client never attempts.
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<StreamEvent> {
        let kind = self
            .event_kind
            .take()
            .filter(|kind| !kind.is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT_KIND.to_string());
        if !std::mem::take(&mut self.has_data) {
            return None;
        }
        Some(StreamEvent::new(kind, std::mem::take(&mut self.data)))
    }
}
