//! Per-face traffic counters.
//!
//! Counters only ever grow. The increment side is crate-private so that
//! nothing outside the face can move them.

use std::fmt;

/// Number of packets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PacketCounter(u64);

impl PacketCounter {
    pub fn get(&self) -> u64 {
        self.0
    }

    pub(crate) fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }
}

/// Number of bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteCounter(u64);

impl ByteCounter {
    pub fn get(&self) -> u64 {
        self.0
    }

    pub(crate) fn add(&mut self, n: usize) {
        self.0 = self.0.saturating_add(n as u64);
    }
}

/// Traffic counters for one face.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceCounters {
    pub(crate) n_in_interests: PacketCounter,
    pub(crate) n_in_data: PacketCounter,
    pub(crate) n_out_interests: PacketCounter,
    pub(crate) n_out_data: PacketCounter,
    pub(crate) n_in_bytes: ByteCounter,
    pub(crate) n_out_bytes: ByteCounter,
}

impl FaceCounters {
    pub fn n_in_interests(&self) -> u64 {
        self.n_in_interests.get()
    }

    pub fn n_in_data(&self) -> u64 {
        self.n_in_data.get()
    }

    pub fn n_out_interests(&self) -> u64 {
        self.n_out_interests.get()
    }

    pub fn n_out_data(&self) -> u64 {
        self.n_out_data.get()
    }

    pub fn n_in_bytes(&self) -> u64 {
        self.n_in_bytes.get()
    }

    pub fn n_out_bytes(&self) -> u64 {
        self.n_out_bytes.get()
    }
}

impl fmt::Display for FaceCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in={}i {}d {}B out={}i {}d {}B",
            self.n_in_interests(),
            self.n_in_data(),
            self.n_in_bytes(),
            self.n_out_interests(),
            self.n_out_data(),
            self.n_out_bytes()
        )
    }
}
