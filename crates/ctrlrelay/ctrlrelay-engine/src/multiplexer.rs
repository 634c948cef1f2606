//! Per-frame cursor that turns one snapshot into `N` indexed poll results.
//!
//! # Cycle
//!
//! ```text
//! poll #      1        2            N        N+1        N+2 ...       next frame
//! cursor      0 ──▶ 1 ──▶ ... ──▶ N-1 ──▶ N ──▶ reset ──▶ drained ...   0
//! result   sample+#0   #1          #N-1    NotFound   NotFound        sample+#0
//! ```
//!
//! - The snapshot is refreshed only when the cursor is 0, so each cycle does
//!   exactly one external read and every index of the cycle sees the same
//!   values.
//! - Floats are emitted first by ascending index, then bools.
//! - After the cycle is exhausted the multiplexer stays drained, answering
//!   `NotFound`, until a poll carries a frame marker (`FIRST_IN_FRAME` or
//!   `FIRST_AFTER_ACTIVATION`). A marker arriving mid-cycle restarts the
//!   cycle and re-samples.

use crate::flags::{NotFound, PollFlags};
use ctrlrelay_events::{FrameLayout, InputEvent, Snapshot};
use tracing::trace;

pub struct IndexMultiplexer {
    layout: FrameLayout,
    /// Index of the next channel to emit.
    cursor: usize,
    /// Set once a cycle ran out; cleared by the next frame marker.
    drained: bool,
    /// Values of the current cycle.
    cached: Snapshot,
}

impl IndexMultiplexer {
    pub fn new(layout: FrameLayout) -> Self {
        Self {
            layout,
            cursor: 0,
            drained: false,
            cached: Snapshot::neutral(layout),
        }
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_drained(&self) -> bool {
        self.drained
    }

    /// Values emitted during the current (or last) cycle.
    pub fn cached(&self) -> &Snapshot {
        &self.cached
    }

    /// Emit the next channel of the cycle. `refresh` is called at most once,
    /// when the cycle starts, to fetch the cycle's snapshot.
    pub fn poll<F>(&mut self, flags: PollFlags, refresh: F) -> Result<InputEvent, NotFound>
    where
        F: FnOnce() -> Snapshot,
    {
        if flags.first_in_frame() || flags.first_after_activation() {
            if self.cursor != 0 {
                trace!(cursor = self.cursor, "frame marker mid-cycle, restarting");
            }
            self.cursor = 0;
            self.drained = false;
        }

        if self.drained {
            return Err(NotFound);
        }

        if self.cursor >= self.layout.channel_count() {
            self.cursor = 0;
            self.drained = true;
            return Err(NotFound);
        }

        if self.cursor == 0 {
            let snap = refresh();
            self.cached = if snap.layout() == self.layout {
                snap
            } else {
                Snapshot::neutral(self.layout)
            };
        }

        let Some(value) = self.cached.value(self.cursor) else {
            return Err(NotFound);
        };
        let event = InputEvent {
            index: self.cursor as u32,
            value,
        };
        self.cursor += 1;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctrlrelay_events::ChannelValue;
    use std::cell::Cell;

    fn snap(nf: usize, nb: usize, seed: f32) -> Snapshot {
        Snapshot::new(
            (0..nf).map(|i| seed + i as f32 / 100.0).collect(),
            (0..nb).map(|i| i % 2 == 0).collect(),
        )
    }

    /// Drain one frame: first poll with the frame marker, then plain polls
    /// until NotFound.
    fn run_frame(
        mux: &mut IndexMultiplexer,
        source: &mut impl FnMut() -> Snapshot,
    ) -> Vec<InputEvent> {
        let mut out = Vec::new();
        let mut flags = PollFlags::FIRST_IN_FRAME;
        while let Ok(ev) = mux.poll(flags, &mut *source) {
            out.push(ev);
            flags = PollFlags::NONE;
        }
        out
    }

    #[test]
    fn full_cycle_emits_every_index_once_in_order() {
        for (nf, nb) in [(1, 0), (0, 1), (3, 0), (4, 15), (2, 5)] {
            let layout = FrameLayout::new(nf, nb);
            let mut mux = IndexMultiplexer::new(layout);
            let mut source = || snap(nf, nb, 0.1);

            let events = run_frame(&mut mux, &mut source);
            let indices: Vec<u32> = events.iter().map(|e| e.index).collect();
            let expected: Vec<u32> = (0..(nf + nb) as u32).collect();
            assert_eq!(indices, expected, "layout {nf}+{nb}");

            for ev in &events {
                let is_float = (ev.index as usize) < nf;
                assert_eq!(matches!(ev.value, ChannelValue::Float(_)), is_float);
            }
        }
    }

    #[test]
    fn samples_exactly_once_per_cycle() {
        let layout = FrameLayout::new(4, 15);
        let mut mux = IndexMultiplexer::new(layout);
        let mut reads = 0;
        let mut source = || {
            reads += 1;
            snap(4, 15, 0.0)
        };

        for _ in 0..5 {
            run_frame(&mut mux, &mut source);
        }
        assert_eq!(reads, 5);
    }

    #[test]
    fn values_are_stable_within_a_cycle() {
        let layout = FrameLayout::new(3, 0);
        let mut mux = IndexMultiplexer::new(layout);
        let mut seed = 0.0;
        let mut source = || {
            seed += 0.1;
            snap(3, 0, seed)
        };

        let events = run_frame(&mut mux, &mut source);
        let floats: Vec<f32> = events.iter().filter_map(|e| e.value.as_float()).collect();
        assert_eq!(floats, snap(3, 0, 0.1).floats);
    }

    #[test]
    fn polls_past_the_end_keep_returning_not_found() {
        let layout = FrameLayout::new(2, 1);
        let mut mux = IndexMultiplexer::new(layout);
        let reads = Cell::new(0);
        let mut source = || {
            reads.set(reads.get() + 1);
            snap(2, 1, 0.0)
        };

        assert_eq!(run_frame(&mut mux, &mut source).len(), 3);
        for _ in 0..10 {
            assert_eq!(mux.poll(PollFlags::NONE, &mut source), Err(NotFound));
        }
        assert!(mux.is_drained());
        assert_eq!(reads.get(), 1);

        // The next frame marker starts a new cycle and re-samples.
        let ev = mux.poll(PollFlags::FIRST_IN_FRAME, &mut source).unwrap();
        assert_eq!(ev.index, 0);
        assert_eq!(reads.get(), 2);
    }

    #[test]
    fn first_poll_starts_a_cycle_without_marker() {
        let layout = FrameLayout::new(1, 1);
        let mut mux = IndexMultiplexer::new(layout);
        let ev = mux
            .poll(PollFlags::NONE, || Snapshot::new(vec![0.5], vec![true]))
            .unwrap();
        assert_eq!(ev.index, 0);
        assert_eq!(ev.value, ChannelValue::Float(0.5));
    }

    #[test]
    fn marker_mid_cycle_restarts_and_resamples() {
        let layout = FrameLayout::new(3, 0);
        let mut mux = IndexMultiplexer::new(layout);
        let mut reads = 0;
        let mut source = || {
            reads += 1;
            snap(3, 0, 0.0)
        };

        mux.poll(PollFlags::FIRST_IN_FRAME, &mut source).unwrap();
        mux.poll(PollFlags::NONE, &mut source).unwrap();
        assert_eq!(mux.cursor(), 2);

        let ev = mux.poll(PollFlags::FIRST_IN_FRAME, &mut source).unwrap();
        assert_eq!(ev.index, 0);
        assert_eq!(reads, 2);
    }

    #[test]
    fn activation_marker_restarts_a_drained_cycle() {
        let layout = FrameLayout::new(1, 0);
        let mut mux = IndexMultiplexer::new(layout);
        let mut source = || snap(1, 0, 0.0);

        run_frame(&mut mux, &mut source);
        assert!(mux.is_drained());
        assert!(
            mux.poll(PollFlags::FIRST_AFTER_ACTIVATION, &mut source)
                .is_ok()
        );
    }

    #[test]
    fn wrong_shape_from_refresh_is_neutralized() {
        let layout = FrameLayout::new(2, 0);
        let mut mux = IndexMultiplexer::new(layout);
        let ev = mux
            .poll(PollFlags::FIRST_IN_FRAME, || Snapshot::new(vec![0.9], vec![]))
            .unwrap();
        assert_eq!(ev.value, ChannelValue::Float(0.0));
    }
}
