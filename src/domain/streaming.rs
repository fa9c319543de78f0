//! Streamed-answer regrouping.
//!
//! The upstream platform emits answer text in arbitrarily small deltas. The
//! [`SentenceChunker`] buffers those deltas and releases them only when the
//! accumulated text ends on a whitespace or punctuation boundary, so clients
//! receive readable sentence-like pieces instead of raw tokens.
//!
//! # Example
//!
//! ```ignore
//! let mut chunker = SentenceChunker::new("");
//! assert_eq!(chunker.push(AnswerFragment::text("Hel")), None);
//! let chunk = chunker.push(AnswerFragment::text("lo. ")).unwrap();
//! assert_eq!(chunk.answer, "Hello. ");
//! ```

use futures::stream::{Stream, StreamExt};
use serde::Serialize;

/// Boundary characters that release the accumulated buffer.
///
/// Flushing on these rather than on every delta trades a little latency for
/// far more readable incremental updates.
pub const DEFAULT_BOUNDARIES: [char; 5] = [' ', '.', '?', '!', ','];

/// A partial piece of assistant text plus the thread id resolved so far.
///
/// Produced by the upstream event decoder, consumed by the chunker. The
/// thread id is empty until the upstream has assigned one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerFragment {
    pub answer: String,
    pub thread_id: String,
}

impl AnswerFragment {
    pub fn new(answer: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            thread_id: thread_id.into(),
        }
    }

    /// A fragment carrying text only, with no thread id yet.
    pub fn text(answer: impl Into<String>) -> Self {
        Self::new(answer, "")
    }
}

/// A boundary-aligned piece of assistant text, ready for delivery.
///
/// `answer` is never empty: the chunker only flushes a non-empty buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerChunk {
    pub answer: String,
    pub thread_id: String,
}

/// Regroups answer fragments into boundary-aligned chunks.
///
/// Latches the thread id: seeded from the caller-supplied value and
/// overwritten by every fragment that carries a non-empty one, so each
/// emitted chunk names the most recently resolved thread.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    buffer: String,
    thread_id: String,
    boundaries: Vec<char>,
}

impl SentenceChunker {
    /// Creates a chunker seeded with the caller-supplied thread id
    /// (empty when the caller did not provide one).
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            thread_id: thread_id.into(),
            boundaries: DEFAULT_BOUNDARIES.to_vec(),
        }
    }

    /// Replaces the boundary character set.
    pub fn with_boundaries(mut self, boundaries: impl Into<Vec<char>>) -> Self {
        self.boundaries = boundaries.into();
        self
    }

    /// Feeds one fragment in; returns a chunk when the buffer now ends on a
    /// boundary character.
    pub fn push(&mut self, fragment: AnswerFragment) -> Option<AnswerChunk> {
        if !fragment.thread_id.is_empty() {
            self.thread_id = fragment.thread_id;
        }
        self.buffer.push_str(&fragment.answer);

        let ends_on_boundary = self
            .buffer
            .chars()
            .next_back()
            .is_some_and(|c| self.boundaries.contains(&c));
        ends_on_boundary.then(|| self.take_chunk())
    }

    /// Releases whatever is left in the buffer at end of input.
    pub fn finish(mut self) -> Option<AnswerChunk> {
        (!self.buffer.is_empty()).then(|| self.take_chunk())
    }

    fn take_chunk(&mut self) -> AnswerChunk {
        AnswerChunk {
            answer: std::mem::take(&mut self.buffer),
            thread_id: self.thread_id.clone(),
        }
    }
}

/// Lazily regroups a fragment stream into boundary-aligned chunks.
///
/// Chunks come out strictly in fragment order; the trailing buffer is flushed
/// once the inner stream ends. Errors pass through unchanged.
pub fn chunk_fragments<S, E>(
    fragments: S,
    thread_id: impl Into<String>,
) -> impl Stream<Item = Result<AnswerChunk, E>>
where
    S: Stream<Item = Result<AnswerFragment, E>>,
{
    let chunker = SentenceChunker::new(thread_id);
    futures::stream::unfold(
        (Box::pin(fragments), Some(chunker)),
        |(mut fragments, mut chunker)| async move {
            loop {
                // None here means the final flush already happened.
                let state = chunker.as_mut()?;
                match fragments.next().await {
                    Some(Ok(fragment)) => {
                        if let Some(chunk) = state.push(fragment) {
                            return Some((Ok(chunk), (fragments, chunker)));
                        }
                    }
                    Some(Err(err)) => return Some((Err(err), (fragments, chunker))),
                    None => {
                        let last = chunker.take().and_then(SentenceChunker::finish);
                        return last.map(|chunk| (Ok(chunk), (fragments, None)));
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use proptest::prelude::*;

    fn collect(chunker: &mut SentenceChunker, fragments: &[&str]) -> Vec<AnswerChunk> {
        fragments
            .iter()
            .filter_map(|f| chunker.push(AnswerFragment::text(*f)))
            .collect()
    }

    #[test]
    fn splits_on_boundary_characters() {
        let mut chunker = SentenceChunker::new("");
        let mut chunks = collect(&mut chunker, &["Hel", "lo, ", "world."]);
        chunks.extend(chunker.finish());

        let answers: Vec<_> = chunks.iter().map(|c| c.answer.as_str()).collect();
        assert_eq!(answers, vec!["Hello, ", "world."]);
    }

    #[test]
    fn buffers_until_end_without_boundary() {
        let mut chunker = SentenceChunker::new("");
        let chunks = collect(&mut chunker, &["abc", "def", "ghi"]);
        assert!(chunks.is_empty());

        let last = chunker.finish().unwrap();
        assert_eq!(last.answer, "abcdefghi");
    }

    #[test]
    fn finish_on_empty_buffer_emits_nothing() {
        let chunker = SentenceChunker::new("t1");
        assert_eq!(chunker.finish(), None);
    }

    #[test]
    fn only_buffer_end_counts_as_boundary() {
        let mut chunker = SentenceChunker::new("");
        // Boundary in the middle of the buffer must not flush.
        assert_eq!(chunker.push(AnswerFragment::text("a, b")), None);
        let chunk = chunker.push(AnswerFragment::text("c.")).unwrap();
        assert_eq!(chunk.answer, "a, bc.");
    }

    #[test]
    fn thread_id_latches_to_last_non_empty() {
        let mut chunker = SentenceChunker::new("caller-thread");

        let first = chunker
            .push(AnswerFragment::new("one ", ""))
            .expect("boundary hit");
        assert_eq!(first.thread_id, "caller-thread");

        let second = chunker
            .push(AnswerFragment::new("two ", "t-42"))
            .expect("boundary hit");
        assert_eq!(second.thread_id, "t-42");

        // Empty thread ids never reset the resolved value.
        let third = chunker
            .push(AnswerFragment::new("three ", ""))
            .expect("boundary hit");
        assert_eq!(third.thread_id, "t-42");
    }

    #[test]
    fn thread_id_updates_before_flush() {
        let mut chunker = SentenceChunker::new("");
        let chunk = chunker
            .push(AnswerFragment::new("done.", "t-9"))
            .expect("boundary hit");
        assert_eq!(chunk.thread_id, "t-9");
    }

    #[test]
    fn custom_boundaries_replace_defaults() {
        let mut chunker = SentenceChunker::new("").with_boundaries(vec![';']);
        assert_eq!(chunker.push(AnswerFragment::text("a. b")), None);
        let chunk = chunker.push(AnswerFragment::text("c;")).unwrap();
        assert_eq!(chunk.answer, "a. bc;");
    }

    #[tokio::test]
    async fn stream_adapter_groups_on_boundary_hit() {
        let fragments = stream::iter(
            ["A", "B."]
                .map(AnswerFragment::text)
                .map(Ok::<_, std::convert::Infallible>),
        );
        let chunks: Vec<_> = chunk_fragments(fragments, "t1").collect().await;

        let chunks: Vec<_> = chunks.into_iter().map(Result::unwrap).collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].answer, "AB.");
        assert_eq!(chunks[0].thread_id, "t1");
    }

    #[tokio::test]
    async fn stream_adapter_preserves_order() {
        let fragments = stream::iter(
            ["First ", "second. ", "tail"]
                .map(AnswerFragment::text)
                .map(Ok::<_, std::convert::Infallible>),
        );
        let chunks: Vec<_> = chunk_fragments(fragments, "")
            .map(Result::unwrap)
            .collect()
            .await;

        let answers: Vec<_> = chunks.iter().map(|c| c.answer.as_str()).collect();
        assert_eq!(answers, vec!["First ", "second. ", "tail"]);
    }

    #[tokio::test]
    async fn stream_adapter_passes_errors_through() {
        let fragments = stream::iter(vec![
            Ok(AnswerFragment::text("keep ")),
            Err("boom"),
        ]);
        let items: Vec<_> = chunk_fragments(fragments, "").collect().await;

        assert_eq!(items[0].as_ref().unwrap().answer, "keep ");
        assert_eq!(items[1], Err("boom"));
    }

    #[tokio::test]
    async fn stream_adapter_empty_input_emits_nothing() {
        let fragments = stream::iter(Vec::<Result<AnswerFragment, ()>>::new());
        let chunks: Vec<_> = chunk_fragments(fragments, "seed").collect().await;
        assert!(chunks.is_empty());
    }

    proptest! {
        #[test]
        fn no_boundary_input_yields_single_trailing_chunk(
            parts in proptest::collection::vec("[a-zA-Z0-9]{0,8}", 0..16)
        ) {
            let mut chunker = SentenceChunker::new("");
            let mid: Vec<_> = parts
                .iter()
                .filter_map(|p| chunker.push(AnswerFragment::text(p.clone())))
                .collect();
            prop_assert!(mid.is_empty());

            let concatenated: String = parts.concat();
            match chunker.finish() {
                Some(chunk) => prop_assert_eq!(chunk.answer, concatenated),
                None => prop_assert!(concatenated.is_empty()),
            }
        }

        #[test]
        fn chunking_is_lossless(parts in proptest::collection::vec(".{0,12}", 0..16)) {
            let mut chunker = SentenceChunker::new("");
            let mut rebuilt = String::new();
            for part in &parts {
                if let Some(chunk) = chunker.push(AnswerFragment::text(part.clone())) {
                    rebuilt.push_str(&chunk.answer);
                }
            }
            if let Some(chunk) = chunker.finish() {
                rebuilt.push_str(&chunk.answer);
            }
            prop_assert_eq!(rebuilt, parts.concat());
        }
    }
}
