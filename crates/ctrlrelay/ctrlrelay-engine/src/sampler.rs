use crate::descriptor::DeviceDescriptor;
use ctrlrelay_events::{FrameLayout, Snapshot};
use ctrlrelay_icc::{ChannelSource, TransportErrorKind};
use tracing::{debug, info, trace, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplerStats {
    /// Cycles sampled.
    pub samples: u64,
    /// Cycles that fell back to the neutral snapshot.
    pub failures: u64,
    /// Failures that were warned about: the first of a streak, or a change
    /// in what is failing.
    pub outages: u64,
}

/// Why a cycle fell back to neutral values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Failure {
    Transport(TransportErrorKind),
    WrongShape,
}

/// Pulls one validated snapshot per cycle out of a channel source.
///
/// Transport failures never leave this type: they are logged and replaced
/// by the neutral snapshot (all floats `0.0`, all bools `false`).
pub struct FrameSampler {
    layout: FrameLayout,
    /// Ids of the bool channels, for transition logging.
    bool_ids: Vec<String>,
    /// Bools of the previous cycle.
    last_bools: Vec<bool>,
    /// Failure of the previous cycle, if it failed. Keeps a dead peer from
    /// producing one warning per frame.
    last_failure: Option<Failure>,
    stats: SamplerStats,
}

impl FrameSampler {
    pub fn new(descriptor: &DeviceDescriptor) -> Self {
        let layout = descriptor.layout();
        let bool_ids = descriptor.describe()[layout.float_count..]
            .iter()
            .map(|c| c.id.clone())
            .collect();
        Self {
            layout,
            bool_ids,
            last_bools: vec![false; layout.bool_count],
            last_failure: None,
            stats: SamplerStats::default(),
        }
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    /// Read the source once and return the clamped snapshot for this cycle.
    pub fn sample<S: ChannelSource + ?Sized>(&mut self, source: &mut S) -> Snapshot {
        self.stats.samples += 1;

        let (failure, detail) = match source.read() {
            Ok(snap) if snap.layout() == self.layout => {
                if let Some(previous) = self.last_failure.take() {
                    info!(endpoint = %source.endpoint(), ?previous, "transport recovered");
                }
                return self.settle(snap);
            }
            Ok(snap) => (
                Failure::WrongShape,
                format!(
                    "frame of shape {:?}, expected {:?}",
                    snap.layout(),
                    self.layout
                ),
            ),
            Err(e) => (Failure::Transport(e.kind()), e.to_string()),
        };

        self.stats.failures += 1;
        if self.last_failure != Some(failure) {
            self.stats.outages += 1;
            warn!(
                endpoint = %source.endpoint(),
                error = %detail,
                "transport read failed, using neutral values"
            );
        } else {
            trace!(error = %detail, "transport read still failing");
        }
        self.last_failure = Some(failure);
        self.settle(Snapshot::neutral(self.layout))
    }

    fn settle(&mut self, raw: Snapshot) -> Snapshot {
        let snap = raw.clamped();
        self.log_transitions(&snap.bools);
        snap
    }

    fn log_transitions(&mut self, bools: &[bool]) {
        for ((id, prev), now) in self.bool_ids.iter().zip(&mut self.last_bools).zip(bools) {
            match (*prev, *now) {
                (false, true) => debug!(channel = %id, "pressed"),
                (true, false) => trace!(channel = %id, "released"),
                _ => {}
            }
            *prev = *now;
        }
    }
}
