use cvsum_core::StreamEvent;
use cvsum_engine::SseDecoder;
use pretty_assertions::assert_eq;

#[test]
fn decodes_named_events_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    let mut events = decoder.feed(b"event: progr");
    assert!(events.is_empty());
    events.extend(decoder.feed(b"ess\ndata: {\"progress\":40}\n"));
    assert!(events.is_empty());
    events.extend(decoder.feed(b"\nevent:result\ndata:{}\n\n"));

    assert_eq!(
        events,
        vec![
            StreamEvent::new("progress", r#"{"progress":40}"#),
            StreamEvent::new("result", "{}"),
        ]
    );
}

#[test]
fn handles_crlf_line_endings() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"event: failed\r\ndata: {\"error\":\"x\"}\r\n\r\n");
    assert_eq!(events, vec![StreamEvent::new("failed", r#"{"error":"x"}"#)]);
}

#[test]
fn joins_multiline_data_and_skips_comments() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b": keep-alive\nevent: result\ndata: line one\n: note\ndata: line two\nid: 7\nretry: 1000\n\n");
    assert_eq!(
        events,
        vec![StreamEvent::new("result", "line one\nline two")]
    );
}

#[test]
fn unnamed_events_default_to_message() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"data: hello\n\n");
    assert_eq!(events, vec![StreamEvent::new("message", "hello")]);
}

#[test]
fn event_without_data_is_not_dispatched() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"event: progress\n\ndata: after\n\n");
    // The event name is reset by the blank line even though nothing was dispatched.
    assert_eq!(events, vec![StreamEvent::new("message", "after")]);
}

#[test]
fn empty_data_field_still_dispatches() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"event: failed\ndata\n\n");
    assert_eq!(events, vec![StreamEvent::new("failed", "")]);
}

#[test]
fn only_one_leading_space_is_stripped() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"data:  padded\n\n");
    assert_eq!(events, vec![StreamEvent::new("message", " padded")]);
}

#[test]
fn leading_byte_order_mark_is_ignored() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed("\u{feff}event: progress\ndata: {}\n\n".as_bytes());
    assert_eq!(events, vec![StreamEvent::new("progress", "{}")]);
}

#[test]
fn unterminated_event_is_held_back() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"event: result\ndata: {\"partial\":true}\n");
    assert!(events.is_empty());
}
