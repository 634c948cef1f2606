use serde::{Deserialize, Serialize};

/// Value kind carried by a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Analog axis, normalized to `[-1.0, 1.0]`.
    Float,
    /// On/off switch.
    Bool,
}

/// One named, typed input line exposed to the host.
///
/// `id` is the semantic control name the host binds against (e.g. `"steering"`),
/// `display_name` is what the host shows in its controls UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub display_name: String,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
        }
    }

    pub fn float(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(id, display_name, ChannelKind::Float)
    }

    pub fn bool(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(id, display_name, ChannelKind::Bool)
    }
}

/// A single channel value as handed to the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelValue {
    Float(f32),
    Bool(bool),
}

impl ChannelValue {
    #[inline]
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelValue::Float(_) => ChannelKind::Float,
            ChannelValue::Bool(_) => ChannelKind::Bool,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            ChannelValue::Float(v) => Some(v),
            ChannelValue::Bool(_) => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ChannelValue::Bool(v) => Some(v),
            ChannelValue::Float(_) => None,
        }
    }
}

/// One emitted poll result: the channel index and its value for this cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub index: u32,
    pub value: ChannelValue,
}
