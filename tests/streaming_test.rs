use bytes::Bytes;
use futures::StreamExt;
use serde_json::json;

use vota::providers::claude::StreamAssembler;
use vota::providers::{ModelEvent, ToolCall};
use vota::streaming::{sse_events, SseDecoder, SseEvent};
use vota::{VotaError, VotaResult};

fn event(name: &str, data: serde_json::Value) -> SseEvent {
    SseEvent {
        event: Some(name.to_string()),
        data: data.to_string(),
    }
}

#[test]
fn decoder_handles_events_split_across_chunks() {
    let mut decoder = SseDecoder::new();

    assert!(decoder.feed(b"event: ping\nda").is_empty());
    let events = decoder.feed(b"ta: {\"type\":\"ping\"}\n\nevent: message_stop\n");
    assert_eq!(
        events,
        vec![SseEvent {
            event: Some("ping".to_string()),
            data: "{\"type\":\"ping\"}".to_string(),
        }]
    );

    let events = decoder.feed(b"data: {}\r\n\r\n");
    assert_eq!(events[0].event.as_deref(), Some("message_stop"));
    assert_eq!(events[0].data, "{}");
}

#[test]
fn decoder_joins_multiline_data_and_skips_comments() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b": keep-alive\ndata: one\ndata: two\n\n");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, None);
    assert_eq!(events[0].data, "one\ntwo");
}

#[test]
fn decoder_keeps_multibyte_characters_split_between_chunks() {
    let mut decoder = SseDecoder::new();
    let bytes = "data: héllo\n\n".as_bytes();
    let split = bytes.iter().position(|b| *b == 0xc3).unwrap() + 1;

    assert!(decoder.feed(&bytes[..split]).is_empty());
    let events = decoder.feed(&bytes[split..]);
    assert_eq!(events[0].data, "héllo");
}

#[test]
fn finish_flushes_unterminated_event() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: message_stop\ndata: {}").is_empty());

    let events = decoder.finish();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "{}");
}

#[tokio::test]
async fn sse_events_wraps_byte_streams() {
    let chunks = vec![
        Ok::<_, VotaError>(Bytes::from_static(b"data: a\n\nda")),
        Ok(Bytes::from_static(b"ta: b\n\n")),
    ];
    let events: Vec<_> = sse_events(futures::stream::iter(chunks)).collect().await;

    let data: Vec<String> = events.into_iter().map(|e| e.unwrap().data).collect();
    assert_eq!(data, ["a", "b"]);
}

#[test]
fn assembler_emits_text_and_tool_use() -> VotaResult<()> {
    let mut assembler = StreamAssembler::new();
    let stream = [
        event("message_start", json!({"type": "message_start", "message": {"id": "msg_1"}})),
        event("content_block_start", json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}})),
        event("content_block_delta", json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "Let me check."}})),
        event("content_block_stop", json!({"type": "content_block_stop", "index": 0})),
        event("content_block_start", json!({"type": "content_block_start", "index": 1, "content_block": {"type": "tool_use", "id": "toolu_1", "name": "supermultiply", "input": {}}})),
        event("content_block_delta", json!({"type": "content_block_delta", "index": 1, "delta": {"type": "input_json_delta", "partial_json": "{\"a\": 2,"}})),
        event("content_block_delta", json!({"type": "content_block_delta", "index": 1, "delta": {"type": "input_json_delta", "partial_json": " \"b\": 3}"}})),
        event("content_block_stop", json!({"type": "content_block_stop", "index": 1})),
        event("message_delta", json!({"type": "message_delta", "delta": {"stop_reason": "tool_use"}})),
        event("message_stop", json!({"type": "message_stop"})),
    ];

    let mut out = Vec::new();
    for e in &stream {
        out.extend(assembler.push(e)?);
    }

    assert_eq!(
        out,
        vec![
            ModelEvent::TextDelta("Let me check.".to_string()),
            ModelEvent::ToolUse(ToolCall {
                id: "toolu_1".to_string(),
                name: "supermultiply".to_string(),
                input: json!({"a": 2, "b": 3}),
            }),
            ModelEvent::Stop {
                reason: Some("tool_use".to_string())
            },
        ]
    );
    Ok(())
}

#[test]
fn assembler_defaults_empty_tool_input_to_object() -> VotaResult<()> {
    let mut assembler = StreamAssembler::new();
    assembler.push(&event(
        "content_block_start",
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "tool_use", "id": "toolu_9", "name": "get_proposals", "input": {}}}),
    ))?;
    let out = assembler.push(&event("content_block_stop", json!({"type": "content_block_stop", "index": 0})))?;

    match &out[0] {
        ModelEvent::ToolUse(call) => assert_eq!(call.input, json!({})),
        other => panic!("unexpected event {:?}", other),
    }
    Ok(())
}

#[test]
fn assembler_surfaces_stream_errors() {
    let mut assembler = StreamAssembler::new();
    let err = assembler
        .push(&event("error", json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}})))
        .unwrap_err();

    assert!(matches!(err, VotaError::Provider(ref msg) if msg.contains("Overloaded")));
}
