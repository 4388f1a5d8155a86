//! Incremental decoding of a server-sent-event body into chat chunks.
//!
//! The body is split on `\n` regardless of how the transport chunks it. Each
//! non-empty line has a fixed 6-byte `data: ` prefix dropped and the rest
//! parsed as a [`StreamResponse`]. Lines that are too short or do not parse
//! (`[DONE]`, comments, keep-alives) are skipped.

use futures_util::{Stream, StreamExt};
use memchr::memchr;

use super::types::StreamResponse;

/// Length of the `data: ` prefix skipped on every line.
pub const DATA_PREFIX_LEN: usize = 6;

/// Buffers partial lines between transport chunks.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and emit every line completed by them (without `\n`/`\r\n`).
    pub fn feed(&mut self, bytes: &[u8], mut on_line: impl FnMut(&[u8])) {
        self.buffer.extend_from_slice(bytes);
        let mut start = 0;
        while let Some(pos) = memchr(b'\n', &self.buffer[start..]) {
            let end = start + pos;
            on_line(trim_cr(&self.buffer[start..end]));
            start = end + 1;
        }
        self.buffer.drain(..start);
    }

    /// Emit the trailing line left without a terminator, if any.
    pub fn finish(self, mut on_line: impl FnMut(&[u8])) {
        if !self.buffer.is_empty() {
            on_line(trim_cr(&self.buffer));
        }
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Parse one line; `None` for blank, short or malformed lines.
pub fn parse_line(line: &[u8]) -> Option<StreamResponse> {
    if line.len() < DATA_PREFIX_LEN {
        return None;
    }
    match serde_json::from_slice::<StreamResponse>(&line[DATA_PREFIX_LEN..]) {
        Ok(resp) => Some(resp),
        Err(e) => {
            tracing::trace!(
                "skipping undecodable line ({} bytes): {}",
                line.len(),
                e
            );
            None
        }
    }
}

/// Drive `body` to completion, handing every decoded chunk to `on_chunk`.
///
/// Transport errors end the stream and are returned as-is.
pub async fn consume<S, B, E>(body: S, mut on_chunk: impl FnMut(StreamResponse)) -> Result<(), E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    futures_util::pin_mut!(body);
    let mut decoder = LineDecoder::new();
    let mut emit = |line: &[u8]| {
        if let Some(resp) = parse_line(line) {
            on_chunk(resp);
        }
    };
    while let Some(chunk) = body.next().await {
        decoder.feed(chunk?.as_ref(), &mut emit);
    }
    decoder.finish(&mut emit);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use proptest::prelude::*;

    const BODY: &str = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"It is \"}}]}\n",
        "\n",
        ": keep-alive\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"noon\"}}]}\r\n",
        "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"id\":\"call_1\",\"type\":\"function\",\"function\":{\"name\":\"get_current_time\",\"arguments\":\"\"}}]}}]}\n",
        "data: not json\n",
        "data: [DONE]\n",
    );

    fn collect_lines(chunks: &[&[u8]]) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        let mut decoder = LineDecoder::new();
        for c in chunks {
            decoder.feed(c, |l| out.push(l.to_vec()));
        }
        decoder.finish(|l| out.push(l.to_vec()));
        out
    }

    fn contents(chunks: &[StreamResponse]) -> String {
        chunks
            .iter()
            .filter_map(|c| c.choices.first())
            .filter_map(|c| c.delta.content.clone())
            .collect()
    }

    #[test]
    fn lines_split_across_chunks_are_joined() {
        let lines = collect_lines(&[b"data: {\"a\"", b":1}\nda", b"ta: x\r\n"]);
        assert_eq!(lines, vec![b"data: {\"a\":1}".to_vec(), b"data: x".to_vec()]);
    }

    #[test]
    fn trailing_line_without_newline_is_emitted() {
        let lines = collect_lines(&[b"one\ntwo"]);
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn short_and_malformed_lines_are_skipped() {
        assert!(parse_line(b"").is_none());
        assert!(parse_line(b"data:").is_none());
        assert!(parse_line(b"data: [DONE]").is_none());
        assert!(parse_line(b"data: {\"choices\":[]}").is_some());
    }

    #[test]
    fn prefix_is_skipped_by_length_not_content() {
        // Any 6-byte prefix is dropped.
        let resp = parse_line(b"xxxxxx{\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}").unwrap();
        assert_eq!(resp.choices[0].delta.content.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn consume_decodes_content_and_tool_calls() {
        let parts: Vec<Result<&[u8], std::io::Error>> = BODY
            .as_bytes()
            .chunks(7)
            .map(Ok)
            .collect();
        let mut seen = Vec::new();
        consume(stream::iter(parts), |c| seen.push(c)).await.unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(contents(&seen), "It is noon");
        let calls = seen[2].choices[0].delta.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].name(), "get_current_time");
        assert!(calls[0].is_function());
        assert_eq!(calls[0].id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn consume_propagates_transport_error() {
        let parts: Vec<Result<&[u8], std::io::Error>> = vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n".as_slice()),
            Err(std::io::Error::other("reset")),
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n".as_slice()),
        ];
        let mut seen = Vec::new();
        let err = consume(stream::iter(parts), |c| seen.push(c))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "reset");
        assert_eq!(contents(&seen), "a");
    }

    proptest! {
        #[test]
        fn line_split_is_independent_of_chunking(cuts in proptest::collection::vec(0usize..BODY.len(), 0..8)) {
            let bytes = BODY.as_bytes();
            let mut cuts = cuts;
            cuts.sort_unstable();
            cuts.dedup();
            let mut chunks: Vec<&[u8]> = Vec::new();
            let mut prev = 0;
            for c in cuts {
                chunks.push(&bytes[prev..c]);
                prev = c;
            }
            chunks.push(&bytes[prev..]);
            prop_assert_eq!(collect_lines(&chunks), collect_lines(&[bytes]));
        }
    }
}
