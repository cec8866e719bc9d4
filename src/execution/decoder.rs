//! Output Decoding
//!
//! Turns raw pipe reads into text pieces: one piece per complete line, plus
//! a best-effort piece for a trailing partial line. A multi-byte UTF-8
//! sequence split across two reads is held back until it is complete;
//! genuinely malformed bytes become U+FFFD.

/// Longest UTF-8 sequence minus one: the most we ever hold back
const MAX_PENDING_UTF8: usize = 3;

#[derive(Debug, Default)]
pub struct OutputDecoder {
    pending: Vec<u8>,
}

impl OutputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes from one read; returns the text pieces ready to emit
    pub fn push(&mut self, data: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(data);

        let mut pieces = Vec::new();
        let mut start = 0;
        while let Some(pos) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + pos + 1;
            pieces.push(String::from_utf8_lossy(&self.pending[start..end]).into_owned());
            start = end;
        }

        let rest = &self.pending[start..];
        let keep = incomplete_tail_len(rest);
        let ready = rest.len() - keep;
        if ready > 0 {
            pieces.push(String::from_utf8_lossy(&rest[..ready]).into_owned());
        }

        self.pending.drain(..start + ready);
        pieces
    }

    /// Flush whatever is left at end of stream
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(text)
    }

    /// Bytes currently held back
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Length of an incomplete (but so far valid) UTF-8 sequence at the end
fn incomplete_tail_len(bytes: &[u8]) -> usize {
    let window = bytes.len().min(MAX_PENDING_UTF8);
    let tail = &bytes[bytes.len() - window..];
    match std::str::from_utf8(tail) {
        Ok(_) => 0,
        Err(e) if e.error_len().is_none() => tail.len() - e.valid_up_to(),
        Err(_) => {
            // Malformed bytes in the window; only the suffix after the
            // last bad byte might still be the start of a valid sequence.
            for skip in 1..window {
                if let Err(e) = std::str::from_utf8(&tail[skip..]) {
                    if e.error_len().is_none() {
                        return tail.len() - skip - e.valid_up_to();
                    }
                } else {
                    return 0;
                }
            }
            0
        }
    }
}
