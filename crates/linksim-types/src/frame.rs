//! # linksim-types::frame
//!
//! The two data units of the simulation. A `Packet` is the opaque
//! network-layer payload; a `Frame` is the data-link unit that carries it
//! across the channel, together with sequencing and acknowledgment fields.
//! Frames travel the simulated channel as in-memory values; no wire encoding
//! exists or is needed.

use crate::seq::SeqNum;

/// The network-layer payload carried inside a DATA frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    pub data: String,
}

impl Packet {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

impl std::fmt::Display for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Packet({:?})", self.data)
    }
}

/// The kind of a data-link frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameKind {
    Data,
    Ack,
    Nak,
}

/// A data-link frame.
///
/// The `corrupted` flag is written only by the channel; the receiving
/// data-link layer decides behavior based on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub seq: SeqNum,
    pub ack: SeqNum,
    pub payload: Option<Packet>,
    pub corrupted: bool,
}

impl Frame {
    /// A DATA frame carrying `payload`, with a piggybacked ack field.
    pub fn data(seq: SeqNum, ack: SeqNum, payload: Packet) -> Self {
        Self {
            kind: FrameKind::Data,
            seq,
            ack,
            payload: Some(payload),
            corrupted: false,
        }
    }

    /// A bare acknowledgment frame.
    pub fn ack(ack: SeqNum) -> Self {
        Self {
            kind: FrameKind::Ack,
            seq: 0,
            ack,
            payload: None,
            corrupted: false,
        }
    }

    /// A negative acknowledgment frame.
    pub fn nak(ack: SeqNum) -> Self {
        Self {
            kind: FrameKind::Nak,
            seq: 0,
            ack,
            payload: None,
            corrupted: false,
        }
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}(seq={}, ack={})", self.kind, self.seq, self.ack)?;
        if self.corrupted {
            write!(f, " [corrupted]")?;
        }
        Ok(())
    }
}
