//! Wire-event decoding for the Orchestrate run stream.
//!
//! A run answers with newline-delimited JSON events. Only two event types
//! matter to the gateway:
//!
//! ```text
//! {"event":"message.delta","data":{"thread_id":"t1","delta":{"content":[{"text":"Hel"}]}}}
//! {"event":"message.created","data":{"thread_id":"t1","message":{"content":[{"text":"Hello."}]}}}
//! ```
//!
//! Decoding is deliberately lenient: blank lines, lines that are not valid
//! JSON, and events of any other type are skipped without surfacing an
//! error, which tolerates keep-alive and comment lines in the transport.

use std::collections::VecDeque;

use futures::stream::{Stream, StreamExt};
use serde::Deserialize;

use crate::domain::streaming::AnswerFragment;
use crate::ports::AgentReply;

/// Event type carrying an incremental answer delta.
pub const MESSAGE_DELTA: &str = "message.delta";

/// Event type carrying a complete answer message.
pub const MESSAGE_CREATED: &str = "message.created";

#[derive(Debug, Deserialize)]
struct RunEvent {
    event: Option<String>,
    data: Option<RunEventData>,
}

#[derive(Debug, Deserialize)]
struct RunEventData {
    thread_id: Option<String>,
    delta: Option<ContentHolder>,
    message: Option<ContentHolder>,
}

#[derive(Debug, Deserialize)]
struct ContentHolder {
    content: Option<Vec<TextBlock>>,
}

#[derive(Debug, Deserialize)]
struct TextBlock {
    text: Option<String>,
}

fn parse_event(line: &str) -> Option<RunEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}

fn first_text(holder: Option<ContentHolder>) -> Option<String> {
    holder?.content?.into_iter().next()?.text
}

/// Decodes one raw line into an answer fragment.
///
/// Returns `None` for blank lines, unparseable lines, events other than
/// `message.delta`, and delta events missing their text payload.
pub fn decode_delta_line(line: &str) -> Option<AnswerFragment> {
    let event = parse_event(line)?;
    if event.event.as_deref() != Some(MESSAGE_DELTA) {
        return None;
    }
    let data = event.data?;
    let thread_id = data.thread_id.unwrap_or_default();
    let text = first_text(data.delta)?;
    Some(AnswerFragment::new(text, thread_id))
}

/// Decodes one raw line into a complete reply, if it is a `message.created`
/// event. Same leniency as [`decode_delta_line`].
pub fn decode_created_line(line: &str) -> Option<AgentReply> {
    let event = parse_event(line)?;
    if event.event.as_deref() != Some(MESSAGE_CREATED) {
        return None;
    }
    let data = event.data?;
    let thread_id = data.thread_id.unwrap_or_default();
    let text = first_text(data.message)?;
    Some(AgentReply::new(text, thread_id))
}

/// Splits a byte stream into text lines.
///
/// Handles `\n` and `\r\n` endings, lines split across byte chunks, and a
/// trailing line without a terminator. Invalid UTF-8 is replaced rather than
/// rejected, in keeping with the lenient decode policy.
pub fn lines<S, B, E>(bytes: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let framer = LineFramer::default();
    futures::stream::unfold((Box::pin(bytes), framer), |(mut bytes, mut framer)| async move {
        loop {
            if let Some(line) = framer.ready.pop_front() {
                return Some((Ok(line), (bytes, framer)));
            }
            if framer.done {
                return None;
            }
            match bytes.next().await {
                Some(Ok(chunk)) => framer.extend(chunk.as_ref()),
                Some(Err(err)) => return Some((Err(err), (bytes, framer))),
                None => framer.finish(),
            }
        }
    })
}

#[derive(Debug, Default)]
struct LineFramer {
    buffer: Vec<u8>,
    ready: VecDeque<String>,
    done: bool,
}

impl LineFramer {
    fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if byte == b'\n' {
                self.push_line();
            } else {
                self.buffer.push(byte);
            }
        }
    }

    fn finish(&mut self) {
        if !self.buffer.is_empty() {
            self.push_line();
        }
        self.done = true;
    }

    fn push_line(&mut self) {
        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }
        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        self.ready.push_back(line);
    }
}
