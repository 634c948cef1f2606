use ctrlrelay_events::{Channel, ChannelKind, FrameLayout, Profile};
use std::collections::HashSet;

/// Device class announced to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceCategory {
    /// Inputs are bound by semantic control name rather than by physical axis/button.
    SemanticInput,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("device has no channels")]
    Empty,

    #[error("duplicate channel id '{0}'")]
    DuplicateId(String),

    #[error("float channel '{0}' follows a bool channel; floats must come first")]
    FloatAfterBool(String),
}

/// Static description of the device, registered once with the host.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceDescriptor {
    id: String,
    display_name: String,
    category: DeviceCategory,
    channels: Vec<Channel>,
    layout: FrameLayout,
}

impl DeviceDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        channels: Vec<Channel>,
    ) -> Result<Self, DescriptorError> {
        if channels.is_empty() {
            return Err(DescriptorError::Empty);
        }

        let mut seen = HashSet::new();
        let mut in_bools = false;
        for ch in &channels {
            if !seen.insert(ch.id.as_str()) {
                return Err(DescriptorError::DuplicateId(ch.id.clone()));
            }
            match ch.kind {
                ChannelKind::Bool => in_bools = true,
                ChannelKind::Float if in_bools => {
                    return Err(DescriptorError::FloatAfterBool(ch.id.clone()));
                }
                ChannelKind::Float => {}
            }
        }

        let float_count = channels
            .iter()
            .filter(|c| c.kind == ChannelKind::Float)
            .count();
        let layout = FrameLayout::new(float_count, channels.len() - float_count);

        Ok(Self {
            id: id.into(),
            display_name: display_name.into(),
            category: DeviceCategory::SemanticInput,
            channels,
            layout,
        })
    }

    pub fn from_profile(
        id: impl Into<String>,
        display_name: impl Into<String>,
        profile: Profile,
    ) -> Result<Self, DescriptorError> {
        Self::new(id, display_name, profile.channels())
    }

    /// Channels in index order.
    #[inline]
    pub fn describe(&self) -> &[Channel] {
        &self.channels
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn category(&self) -> DeviceCategory {
        self.category
    }

    #[inline]
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }
}
