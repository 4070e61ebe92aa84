/// Accumulates raw response bytes and hands out complete SSE event blocks.
///
/// Bytes are kept undecoded until a block boundary so multi-byte characters
/// split across network chunks survive intact.
#[derive(Debug, Default)]
pub struct SseBuffer {
    buffer: Vec<u8>,
}

impl SseBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));
    }

    pub fn next_event_block(&mut self) -> Option<String> {
        let boundary = self.buffer.windows(2).position(|w| w == b"\n\n")?;
        let remaining = self.buffer.split_off(boundary + 2);
        let event_block = std::mem::replace(&mut self.buffer, remaining);
        Some(String::from_utf8_lossy(&event_block).into_owned())
    }

    /// Whatever is left once the body ends without a closing blank line.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.buffer.iter().all(u8::is_ascii_whitespace) {
            self.buffer.clear();
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

pub fn parse_data_lines(event_block: &str) -> Vec<&str> {
    event_block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect()
}

pub fn parse_data_lines_without_done(event_block: &str) -> Vec<&str> {
    parse_data_lines(event_block)
        .into_iter()
        .filter(|data| data.trim() != "[DONE]")
        .collect()
}
