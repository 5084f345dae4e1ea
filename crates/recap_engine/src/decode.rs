use encoding_rs::{CoderResult, Decoder, UTF_8};
use recap_logging::recap_debug;

/// Separator between frames on the wire.
pub const FRAME_DELIMITER: &str = "\n\n";

/// Incremental splitter for the `"\n\n"`-delimited progress stream.
///
/// One decoder per response body. Bytes may arrive cut at any offset, including
/// inside a multi-byte character; the UTF-8 decoder keeps the dangling bytes until
/// the rest of the sequence arrives.
pub struct FrameDecoder {
    utf8: Decoder,
    buffer: String,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            utf8: UTF_8.new_decoder_with_bom_removal(),
            buffer: String::new(),
        }
    }

    /// Appends a chunk and returns every frame it completed, in arrival order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        // A delimiter may straddle the old tail and the new text.
        let scan_from = self.buffer.len().saturating_sub(FRAME_DELIMITER.len() - 1);
        self.decode_into_buffer(chunk, false);
        self.drain_frames(scan_from)
    }

    /// Flushes the decoder at end of stream.
    ///
    /// Text after the last delimiter is an unterminated frame and is dropped.
    pub fn finish(self) -> Vec<String> {
        self.finish_with_tail().0
    }

    /// Like [`finish`](Self::finish), also returning the length of the dropped tail.
    ///
    /// The length is measured after the flush, so dangling bytes of an incomplete
    /// UTF-8 sequence count (as the replacement character they decode to).
    pub fn finish_with_tail(mut self) -> (Vec<String>, usize) {
        let scan_from = self.buffer.len().saturating_sub(FRAME_DELIMITER.len() - 1);
        self.decode_into_buffer(&[], true);
        let frames = self.drain_frames(scan_from);
        let tail = self.buffer.len();
        if tail > 0 {
            recap_debug!("Discarding unterminated trailing frame ({} bytes)", tail);
        }
        (frames, tail)
    }

    /// Length in bytes of the undelimited text held since the last frame.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    fn decode_into_buffer(&mut self, mut src: &[u8], last: bool) {
        loop {
            let needed = self
                .utf8
                .max_utf8_buffer_length(src.len())
                .unwrap_or(src.len().saturating_mul(3).saturating_add(4));
            self.buffer.reserve(needed);
            let (result, read, _had_errors) =
                self.utf8.decode_to_string(src, &mut self.buffer, last);
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }

    /// Splits complete frames off the front of the buffer, left to right.
    ///
    /// The buffer never holds a full delimiter between calls, so scanning can
    /// start just before the text appended by this call.
    fn drain_frames(&mut self, scan_from: usize) -> Vec<String> {
        let mut frames = Vec::new();
        let mut consumed = 0;
        let mut search = scan_from;
        while let Some(pos) = find_delimiter(self.buffer.as_bytes(), search) {
            let frame = &self.buffer[consumed..pos];
            if !frame.is_empty() {
                frames.push(frame.to_owned());
            }
            consumed = pos + FRAME_DELIMITER.len();
            search = consumed;
        }
        if consumed > 0 {
            self.buffer.drain(..consumed);
        }
        frames
    }
}

// '\n' is ASCII, so every match is also a char boundary.
fn find_delimiter(haystack: &[u8], from: usize) -> Option<usize> {
    let needle = FRAME_DELIMITER.as_bytes();
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}
