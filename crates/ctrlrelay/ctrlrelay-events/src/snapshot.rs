use crate::channel::ChannelValue;
use crate::layout::FrameLayout;

/// Lower bound of a float channel.
pub const FLOAT_MIN: f32 = -1.0;
/// Upper bound of a float channel.
pub const FLOAT_MAX: f32 = 1.0;

/// The values of every channel for one polling cycle.
///
/// Floats and bools are kept in two blocks, in channel order, matching the
/// index space of the device: float `i` is channel `i`, bool `j` is channel
/// `float_count + j`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub floats: Vec<f32>,
    pub bools: Vec<bool>,
}

impl Snapshot {
    pub fn new(floats: Vec<f32>, bools: Vec<bool>) -> Self {
        Self { floats, bools }
    }

    /// All floats `0.0`, all bools `false`.
    pub fn neutral(layout: FrameLayout) -> Self {
        Self {
            floats: vec![0.0; layout.float_count],
            bools: vec![false; layout.bool_count],
        }
    }

    #[inline]
    pub fn layout(&self) -> FrameLayout {
        FrameLayout::new(self.floats.len(), self.bools.len())
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.floats.len() + self.bools.len()
    }

    /// Clamp every float into `[-1.0, 1.0]`. NaN becomes `0.0`.
    pub fn clamp_in_place(&mut self) {
        for v in &mut self.floats {
            *v = clamp_axis(*v);
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp_in_place();
        self
    }

    /// True when every float is inside `[-1.0, 1.0]`.
    pub fn is_in_range(&self) -> bool {
        self.floats.iter().all(|v| (FLOAT_MIN..=FLOAT_MAX).contains(v))
    }

    /// Value of channel `index` (floats first, then bools).
    pub fn value(&self, index: usize) -> Option<ChannelValue> {
        let nf = self.floats.len();
        if index < nf {
            Some(ChannelValue::Float(self.floats[index]))
        } else {
            self.bools.get(index - nf).copied().map(ChannelValue::Bool)
        }
    }
}

#[inline]
pub fn clamp_axis(v: f32) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(FLOAT_MIN, FLOAT_MAX)
}
