use std::sync::LazyLock;

use memchr::memmem::Finder;

static START_CODE: LazyLock<Finder> = LazyLock::new(|| Finder::new(&[0x00, 0x00, 0x01]));

/// Location of one NAL unit inside an Annex B byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaluSpan {
    /// Offset of the first byte of the start code.
    pub start_offset: usize,
    /// Offset of the first payload byte (the NAL header), directly after
    /// the start code.
    pub payload_start_offset: usize,
    /// Payload length in bytes, counting from `payload_start_offset`.
    pub payload_size: usize,
}

impl NaluSpan {
    pub fn start_code_len(&self) -> usize {
        self.payload_start_offset - self.start_offset
    }
}

fn find_start_code(data: &[u8], from: usize) -> Option<(usize, usize)> {
    let found = START_CODE.find(&data[from..])?;
    let mut start_offset = from + found;
    let payload_start_offset = start_offset + 3;

    // A 0x00000001 start code owns its leading zero byte.
    if start_offset > 0 && data[start_offset - 1] == 0x00 {
        start_offset -= 1;
    }

    Some((start_offset, payload_start_offset))
}

/// Returns the NAL unit locations in `data`, in stream order. Bytes before
/// the first start code are skipped; the final NAL unit runs to the end of
/// the buffer. No start code yields an empty vector.
pub fn find_nalu_indices(data: &[u8]) -> Vec<NaluSpan> {
    let mut spans: Vec<NaluSpan> = Vec::new();
    let mut from = 0;

    while let Some((start_offset, payload_start_offset)) = find_start_code(data, from) {
        if let Some(prev) = spans.last_mut() {
            prev.payload_size = start_offset - prev.payload_start_offset;
        }

        spans.push(NaluSpan {
            start_offset,
            payload_start_offset,
            payload_size: 0,
        });

        from = payload_start_offset;
    }

    if let Some(last) = spans.last_mut() {
        last.payload_size = data.len() - last.payload_start_offset;
    }

    spans
}

/// Incremental Annex B scanner for callers that feed the stream in chunks.
/// A NAL unit is emitted once the start code of the following unit has been
/// seen; `flush` hands out the trailing unit.
pub struct StartCodeScanner {
    buffer: Vec<u8>,
    search_start: usize,
    pending: Option<NaluSpan>,
}

impl StartCodeScanner {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            search_start: 0,
            pending: None,
        }
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Next complete NAL unit, if one has been delimited by a following
    /// start code. Offsets are relative to everything pushed since the
    /// last `reset`.
    pub fn next_nal_unit(&mut self) -> Option<NaluSpan> {
        loop {
            match find_start_code(&self.buffer, self.search_start) {
                Some((start_offset, payload_start_offset)) => {
                    self.search_start = payload_start_offset;

                    let next = NaluSpan {
                        start_offset,
                        payload_start_offset,
                        payload_size: 0,
                    };

                    if let Some(mut span) = self.pending.take() {
                        span.payload_size = start_offset - span.payload_start_offset;
                        self.pending = Some(next);
                        return Some(span);
                    }

                    self.pending = Some(next);
                }
                None => return None,
            }
        }
    }

    /// Trailing NAL unit, terminated by the buffer end.
    pub fn flush(&mut self) -> Option<NaluSpan> {
        let mut span = self.pending.take()?;
        span.payload_size = self.buffer.len() - span.payload_start_offset;
        Some(span)
    }

    pub fn get_nal_data(&self, span: &NaluSpan) -> &[u8] {
        &self.buffer[span.payload_start_offset..span.payload_start_offset + span.payload_size]
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.search_start = 0;
        self.pending = None;
    }
}

impl Default for StartCodeScanner {
    fn default() -> Self {
        Self::new()
    }
}
