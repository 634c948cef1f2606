//! Binary layout of one frame of channel values.
//!
//! Both transports move the same headerless block: every float channel as a
//! 4-byte IEEE-754 value in channel order, followed by one byte per boolean
//! channel in channel order. Producer and consumer agree on the channel
//! table out of band; there is no magic, version or length prefix.
//!
//! # Layout
//!
//! ```text
//! ┌──────────┬──────────┬─────┬──────────────┬────┬────┬─────┬──────────────┐
//! │ float[0] │ float[1] │ ... │ float[nf-1]  │ b0 │ b1 │ ... │ b[nb-1]      │
//! │  (4B)    │  (4B)    │     │  (4B)        │(1B)│(1B)│     │ (1B)         │
//! └──────────┴──────────┴─────┴──────────────┴────┴────┴─────┴──────────────┘
//!   offset 0                                   offset nf*4       len = nf*4 + nb
//! ```
//!
//! A boolean byte decodes as `true` for any non-zero value and encodes as
//! `0`/`1`.

use crate::snapshot::Snapshot;
use std::mem::size_of;

/// Byte order of the float block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    /// Host order. Used for shared memory, where both sides run on the same machine.
    Native,
    /// Little-endian. Used on the socket.
    Little,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("frame is {actual} bytes, layout expects {expected}")]
    Length { expected: usize, actual: usize },

    #[error("snapshot has {actual_floats} floats and {actual_bools} bools, layout expects {expected_floats} and {expected_bools}")]
    Shape {
        expected_floats: usize,
        expected_bools: usize,
        actual_floats: usize,
        actual_bools: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameLayout {
    pub float_count: usize,
    pub bool_count: usize,
}

impl FrameLayout {
    pub const FLOAT_SIZE: usize = size_of::<f32>();
    pub const BOOL_SIZE: usize = size_of::<u8>();

    pub const fn new(float_count: usize, bool_count: usize) -> Self {
        Self {
            float_count,
            bool_count,
        }
    }

    #[inline]
    pub const fn channel_count(&self) -> usize {
        self.float_count + self.bool_count
    }

    /// Byte offset of the boolean block.
    #[inline]
    pub const fn bool_offset(&self) -> usize {
        self.float_count * Self::FLOAT_SIZE
    }

    /// Total frame size in bytes: `nf * 4 + nb`.
    #[inline]
    pub const fn len(&self) -> usize {
        self.bool_offset() + self.bool_count * Self::BOOL_SIZE
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn decode(&self, bytes: &[u8], order: ByteOrder) -> Result<Snapshot, LayoutError> {
        if bytes.len() != self.len() {
            return Err(LayoutError::Length {
                expected: self.len(),
                actual: bytes.len(),
            });
        }

        let (float_block, bool_block) = bytes.split_at(self.bool_offset());
        let floats = float_block
            .chunks_exact(Self::FLOAT_SIZE)
            .map(|c| {
                let raw = [c[0], c[1], c[2], c[3]];
                match order {
                    ByteOrder::Native => f32::from_ne_bytes(raw),
                    ByteOrder::Little => f32::from_le_bytes(raw),
                }
            })
            .collect();
        let bools = bool_block.iter().map(|b| *b != 0).collect();

        Ok(Snapshot { floats, bools })
    }

    /// Encode `snapshot` into `out`, which must be exactly `len()` bytes.
    pub fn encode_into(
        &self,
        snapshot: &Snapshot,
        order: ByteOrder,
        out: &mut [u8],
    ) -> Result<(), LayoutError> {
        if snapshot.floats.len() != self.float_count || snapshot.bools.len() != self.bool_count {
            return Err(LayoutError::Shape {
                expected_floats: self.float_count,
                expected_bools: self.bool_count,
                actual_floats: snapshot.floats.len(),
                actual_bools: snapshot.bools.len(),
            });
        }
        if out.len() != self.len() {
            return Err(LayoutError::Length {
                expected: self.len(),
                actual: out.len(),
            });
        }

        let (float_block, bool_block) = out.split_at_mut(self.bool_offset());
        for (dst, v) in float_block
            .chunks_exact_mut(Self::FLOAT_SIZE)
            .zip(&snapshot.floats)
        {
            let raw = match order {
                ByteOrder::Native => v.to_ne_bytes(),
                ByteOrder::Little => v.to_le_bytes(),
            };
            dst.copy_from_slice(&raw);
        }
        for (dst, b) in bool_block.iter_mut().zip(&snapshot.bools) {
            *dst = u8::from(*b);
        }

        Ok(())
    }

    pub fn encode(&self, snapshot: &Snapshot, order: ByteOrder) -> Result<Vec<u8>, LayoutError> {
        let mut out = vec![0u8; self.len()];
        self.encode_into(snapshot, order, &mut out)?;
        Ok(out)
    }
}
