use std::ops::BitOr;

/// Flags the host passes with every poll.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PollFlags(pub u32);

impl PollFlags {
    pub const NONE: PollFlags = PollFlags(0);
    /// First poll of the current frame. Marks a cycle boundary.
    pub const FIRST_IN_FRAME: PollFlags = PollFlags(0x0000_0001);
    /// First poll since the device was (re)activated.
    pub const FIRST_AFTER_ACTIVATION: PollFlags = PollFlags(0x0000_0002);

    #[inline]
    pub const fn contains(self, other: PollFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn first_in_frame(self) -> bool {
        self.contains(Self::FIRST_IN_FRAME)
    }

    #[inline]
    pub const fn first_after_activation(self) -> bool {
        self.contains(Self::FIRST_AFTER_ACTIVATION)
    }
}

impl BitOr for PollFlags {
    type Output = PollFlags;

    fn bitor(self, rhs: PollFlags) -> PollFlags {
        PollFlags(self.0 | rhs.0)
    }
}

/// No channel left to emit this frame. Not an error: the host stops polling
/// until the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no more input events this frame")]
pub struct NotFound;
