// Compiled-in channel tables.
//
// The ids are the semantic control names the game binds against in
// controls.sii; only some controls are accepted by a semantical device.
// Every table lists its float channels before its bool channels, which is
// what the index space and the frame layout assume.

use crate::channel::{Channel, ChannelKind};
use crate::layout::FrameLayout;
use serde::{Deserialize, Serialize};

use ChannelKind::{Bool, Float};

type Entry = (&'static str, &'static str, ChannelKind);

const LANE_ASSIST: [Entry; 19] = [
    ("steering", "ETS2LA Steering", Float),
    ("aforward", "ETS2LA Forward", Float),
    ("abackward", "ETS2LA Backward", Float),
    ("clutch", "ETS2LA Clutch", Float),
    ("pause", "ETS2LA Pause", Bool),
    ("parkingbrake", "ETS2LA Parking Brake", Bool),
    ("wipers", "ETS2LA Wipers", Bool),
    ("cruiectrl", "ETS2LA Cruise Control", Bool),
    ("cruiectrlinc", "ETS2LA Cruise Control Increase", Bool),
    ("cruiectrldec", "ETS2LA Cruise Control Decrease", Bool),
    ("cruiectrlres", "ETS2LA Cruise Control Reset", Bool),
    ("light", "ETS2LA Lights", Bool),
    ("hblight", "ETS2LA High Beams", Bool),
    ("lblinker", "ETS2LA Left Blinker", Bool),
    ("rblinker", "ETS2LA Right Blinker", Bool),
    ("quickpark", "ETS2LA Quickpark", Bool),
    ("drive", "ETS2LA Drive", Bool),
    ("reverse", "ETS2LA Reverse", Bool),
    ("cycl_zoom", "ETS2LA Cycle Zoom", Bool),
];

// Socket peers only ever send steering, throttle and brake.
const STEERING: [Entry; 3] = [
    ("steering", "ETS2LA Steering", Float),
    ("aforward", "ETS2LA Forward", Float),
    ("abackward", "ETS2LA Backward", Float),
];

/// A named channel table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// 4 axes and 15 switches.
    #[default]
    LaneAssist,
    /// 3 axes, no switches.
    Steering,
}

impl Profile {
    fn entries(&self) -> &'static [Entry] {
        match self {
            Profile::LaneAssist => &LANE_ASSIST,
            Profile::Steering => &STEERING,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Profile::LaneAssist => "lane_assist",
            Profile::Steering => "steering",
        }
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.entries()
            .iter()
            .map(|&(id, display_name, kind)| Channel::new(id, display_name, kind))
            .collect()
    }

    pub fn layout(&self) -> FrameLayout {
        let float_count = self
            .entries()
            .iter()
            .filter(|(_, _, kind)| *kind == Float)
            .count();
        FrameLayout::new(float_count, self.entries().len() - float_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats_precede_bools(channels: &[Channel]) -> bool {
        channels
            .windows(2)
            .all(|w| !(w[0].kind == Bool && w[1].kind == Float))
    }

    #[test]
    fn lane_assist_table() {
        let channels = Profile::LaneAssist.channels();
        assert_eq!(channels.len(), 19);
        assert_eq!(Profile::LaneAssist.layout(), FrameLayout::new(4, 15));
        assert!(floats_precede_bools(&channels));
        assert_eq!(channels[0].id, "steering");
        assert_eq!(channels[4].id, "pause");
        assert_eq!(channels[18].display_name, "ETS2LA Cycle Zoom");
    }

    #[test]
    fn steering_table() {
        let channels = Profile::Steering.channels();
        assert_eq!(channels.len(), 3);
        assert_eq!(Profile::Steering.layout(), FrameLayout::new(3, 0));
        assert_eq!(Profile::Steering.layout().len(), 12);
        assert!(channels.iter().all(|c| c.kind == Float));
    }
}
