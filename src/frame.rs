//! Wire framing: header, direction byte, XOR checksum, and the byte-at-a-time
//! frame decoder.
//!
//! A frame is:
//!
//! ```text
//! '$' 'M' <dir> <payload-length:1> <message-id:1> <payload ...> <checksum:1>
//! ```
//!
//! - `dir` is `'<'` for requests and their replies (ID < 200) and `'>'` for
//!   state messages (ID >= 200).
//! - The checksum is an XOR fold over `[payload-length, message-id,
//!   payload...]` — the `$`, `M`, and direction bytes are NOT part of the
//!   checksum domain. Get this range wrong and every frame is
//!   wire-incompatible.
//! - Multi-byte payload fields are little-endian, packed with no padding.
//!
//! A request (ID < 200) carries no field data; its canonical encoding treats
//! the requested ID as a one-byte pseudo-payload, so the ID appears twice:
//! `['$','M','<', 0, id, id, xor(0, id, id)]`. A decoder that follows the
//! length byte still accepts this: with length 0 it reads the first ID then
//! takes the next byte as checksum (`0 ^ id == id`), leaving the trailing
//! zero byte to be skipped while hunting for the next `'$'`.

/// Frame header bytes.
pub const HDR_PREAMBLE: u8 = b'$';
pub const HDR_MAGIC: u8 = b'M';
/// Direction byte for requests/replies (ID < 200).
pub const DIR_TO_CONTROLLER: u8 = b'<';
/// Direction byte for state messages (ID >= 200).
pub const DIR_FROM_CONTROLLER: u8 = b'>';

/// First message ID of the state-message range. IDs below this are
/// request-class.
pub const STATE_ID_FLOOR: u8 = 200;

/// Maximum payload a frame can carry (length field is one byte).
pub const MAX_PAYLOAD: usize = 255;

/// XOR parity checksum over the frame's checksum domain
/// (`[length, id, payload...]`). Despite the protocol's historical "CRC8"
/// name this is a plain XOR fold, not a polynomial CRC.
pub fn checksum(domain: &[u8]) -> u8 {
    domain.iter().fold(0, |acc, &b| acc ^ b)
}

/// Direction byte for a message ID.
pub fn direction_for(id: u8) -> u8 {
    if id < STATE_ID_FLOOR {
        DIR_TO_CONTROLLER
    } else {
        DIR_FROM_CONTROLLER
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("payload of {0} bytes exceeds the one-byte length field")]
    PayloadTooLong(usize),
    #[error("checksum mismatch: expected {expected:#04x}, got {got:#04x}")]
    ChecksumMismatch { expected: u8, got: u8 },
}

/// Encode a complete payload-bearing frame for `id`.
pub fn encode_frame(id: u8, payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLong(payload.len()));
    }
    let len = payload.len() as u8;
    let mut out = Vec::with_capacity(payload.len() + 6);
    out.push(HDR_PREAMBLE);
    out.push(HDR_MAGIC);
    out.push(direction_for(id));
    out.push(len);
    out.push(id);
    out.extend_from_slice(payload);
    let ck = checksum(&out[3..]);
    out.push(ck);
    Ok(out)
}

/// Encode the canonical zero-payload request frame for `id`. The ID is
/// doubled in the body and both copies enter the checksum domain, so the
/// checksum is always `0 ^ id ^ id == 0`.
pub fn encode_request(id: u8) -> [u8; 7] {
    let ck = checksum(&[0, id, id]);
    [HDR_PREAMBLE, HDR_MAGIC, DIR_TO_CONTROLLER, 0, id, id, ck]
}

/// One decoded wire frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub direction: u8,
    pub id: u8,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Hunting for `'$'`.
    Idle,
    /// Got `'$'`, expecting `'M'`.
    Preamble,
    /// Expecting the direction byte.
    Direction,
    /// Expecting the payload length.
    Length,
    /// Expecting the message ID.
    Id,
    /// Consuming payload bytes.
    Payload,
    /// Expecting the checksum byte.
    Checksum,
}

/// Byte-at-a-time frame decoder. Strictly sequential: feed each received byte
/// and collect a [`Frame`] when one completes. Each serial link must own its
/// own decoder; sharing one across links would interleave partial frames.
#[derive(Debug)]
pub struct FrameDecoder {
    state: DecodeState,
    direction: u8,
    length: u8,
    id: u8,
    payload: Vec<u8>,
    acc: u8,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        FrameDecoder {
            state: DecodeState::Idle,
            direction: 0,
            length: 0,
            id: 0,
            payload: Vec::new(),
            acc: 0,
        }
    }

    /// Drop any partial frame and return to hunting for `'$'`.
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
        self.payload.clear();
        self.acc = 0;
    }

    /// Consume one byte. Returns a complete frame when the checksum byte
    /// arrives and matches; a mismatch drops the frame (recoverable, the
    /// decoder resets and resumes hunting) and returns the error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            DecodeState::Idle => {
                if byte == HDR_PREAMBLE {
                    self.state = DecodeState::Preamble;
                }
            }
            DecodeState::Preamble => {
                if byte == HDR_MAGIC {
                    self.state = DecodeState::Direction;
                } else if byte != HDR_PREAMBLE {
                    // A repeated '$' may still start a frame; anything else
                    // is noise.
                    self.reset();
                }
            }
            DecodeState::Direction => {
                self.direction = byte;
                self.state = DecodeState::Length;
            }
            DecodeState::Length => {
                self.length = byte;
                self.acc = byte;
                self.state = DecodeState::Id;
            }
            DecodeState::Id => {
                self.id = byte;
                self.acc ^= byte;
                self.payload.clear();
                self.state = if self.length == 0 {
                    DecodeState::Checksum
                } else {
                    DecodeState::Payload
                };
            }
            DecodeState::Payload => {
                self.payload.push(byte);
                self.acc ^= byte;
                if self.payload.len() == self.length as usize {
                    self.state = DecodeState::Checksum;
                }
            }
            DecodeState::Checksum => {
                let expected = self.acc;
                let frame = Frame {
                    direction: self.direction,
                    id: self.id,
                    payload: std::mem::take(&mut self.payload),
                };
                self.reset();
                if byte == expected {
                    return Ok(Some(frame));
                }
                tracing::warn!(
                    id = frame.id,
                    expected,
                    got = byte,
                    "dropping frame with bad checksum"
                );
                return Err(FrameError::ChecksumMismatch {
                    expected,
                    got: byte,
                });
            }
        }
        Ok(None)
    }

    /// Feed a whole buffer, collecting completed frames and silently dropping
    /// checksum failures (already logged by [`feed`](Self::feed)).
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Vec<Frame> {
        let mut out = Vec::new();
        for &b in bytes {
            if let Ok(Some(frame)) = self.feed(b) {
                out.push(frame);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_xor_fold() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0x69]), 0x69);
        assert_eq!(checksum(&[0, 105, 105]), 0);
        assert_eq!(checksum(&[3, 108, 0xaa, 0x55, 0x01]), 3 ^ 108 ^ 0xaa ^ 0x55 ^ 0x01);
    }

    #[test]
    fn request_frame_literal_for_id_105() {
        assert_eq!(
            encode_request(105),
            [0x24, 0x4d, 0x3c, 0x00, 0x69, 0x69, 0x00]
        );
    }

    #[test]
    fn direction_byte_follows_id_range() {
        let req = encode_frame(108, &[1, 2]).expect("encode");
        assert_eq!(req[2], b'<');
        let state = encode_frame(200, &[1, 2]).expect("encode");
        assert_eq!(state[2], b'>');
    }

    #[test]
    fn direction_byte_is_outside_checksum_domain() {
        let mut bytes = encode_frame(200, &[7, 8, 9]).expect("encode");
        let ck = *bytes.last().unwrap();
        bytes[2] = b'<'; // flip direction
        assert_eq!(checksum(&bytes[3..bytes.len() - 1]), ck);
    }

    #[test]
    fn every_domain_byte_is_checksum_sensitive() {
        let bytes = encode_frame(201, &[0x10, 0x20, 0x30]).expect("encode");
        let ck = *bytes.last().unwrap();
        for i in 3..bytes.len() - 1 {
            let mut mutated = bytes.clone();
            mutated[i] ^= 0x01;
            assert_ne!(
                checksum(&mutated[3..mutated.len() - 1]),
                ck,
                "flipping byte {} must change the checksum",
                i
            );
        }
    }

    #[test]
    fn decoder_round_trips_a_frame() {
        let bytes = encode_frame(202, &[0xde, 0xad, 0xbe, 0xef]).expect("encode");
        let mut dec = FrameDecoder::new();
        let frames = dec.feed_bytes(&bytes);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, 202);
        assert_eq!(frames[0].payload, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decoder_accepts_canonical_request_and_resynchronizes() {
        // Length 0 means the second ID byte is read as the checksum
        // (0 ^ id == id); the trailing zero is skipped in Idle.
        let bytes = encode_request(105);
        let mut dec = FrameDecoder::new();
        let frames = dec.feed_bytes(&bytes);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, 105);
        assert!(frames[0].payload.is_empty());

        // Still usable for the next frame.
        let next = encode_frame(210, &[1]).expect("encode");
        let frames = dec.feed_bytes(&next);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, 210);
    }

    #[test]
    fn checksum_mismatch_drops_frame_and_recovers() {
        let mut bad = encode_frame(205, &[1, 2, 3]).expect("encode");
        let last = bad.len() - 1;
        bad[last] ^= 0xff;
        let mut dec = FrameDecoder::new();
        let mut mismatches = 0;
        for &b in &bad {
            match dec.feed(b) {
                Ok(Some(_)) => panic!("corrupt frame must not decode"),
                Ok(None) => {}
                Err(FrameError::ChecksumMismatch { .. }) => mismatches += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(mismatches, 1);

        let good = encode_frame(205, &[1, 2, 3]).expect("encode");
        assert_eq!(dec.feed_bytes(&good).len(), 1);
    }

    #[test]
    fn garbage_between_frames_is_ignored() {
        let mut stream = vec![0x00, 0x24, 0x99, b'X'];
        stream.extend_from_slice(&encode_frame(208, &[5]).expect("encode"));
        stream.extend_from_slice(&[0xff, 0xff]);
        stream.extend_from_slice(&encode_frame(209, &[6]).expect("encode"));
        let mut dec = FrameDecoder::new();
        let frames = dec.feed_bytes(&stream);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].id, 208);
        assert_eq!(frames[1].id, 209);
    }
}
