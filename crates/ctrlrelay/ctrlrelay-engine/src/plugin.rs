use crate::descriptor::DeviceDescriptor;
use crate::flags::{NotFound, PollFlags};
use crate::host::{Host, RegistrationError, Severity};
use crate::multiplexer::IndexMultiplexer;
use crate::sampler::{FrameSampler, SamplerStats};
use ctrlrelay_events::{FrameLayout, InputEvent};
use ctrlrelay_icc::ChannelSource;
use tracing::{info, warn};

/// Input API version 1.00, the only one this plugin speaks.
pub const INPUT_API_VERSION_1_00: u32 = 0x0001_0000;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("unsupported input API version {version:#010x}")]
    UnsupportedVersion { version: u32 },

    #[error("transport carries {transport:?} but the device describes {device:?}")]
    LayoutMismatch {
        device: FrameLayout,
        transport: FrameLayout,
    },

    #[error("device registration failed")]
    Registration(#[from] RegistrationError),
}

/// The single plugin instance of a host process.
///
/// Owns the device descriptor, the transport and the per-frame state. The
/// host adapter keeps it alive between `init` and `shutdown` and forwards
/// every poll to [`InputPlugin::poll`].
pub struct InputPlugin<S: ChannelSource> {
    descriptor: DeviceDescriptor,
    source: S,
    sampler: FrameSampler,
    mux: IndexMultiplexer,
}

impl<S: ChannelSource> InputPlugin<S> {
    /// Open the transport and register the device with the host.
    ///
    /// An unavailable transport is not an error: the plugin starts anyway and
    /// reports neutral values until the transport comes up. A host refusing
    /// the device is fatal; the transport is closed again and nothing is
    /// returned to poll.
    pub fn init<H: Host + ?Sized>(
        version: u32,
        descriptor: DeviceDescriptor,
        mut source: S,
        host: &mut H,
    ) -> Result<Self, InitError> {
        if version != INPUT_API_VERSION_1_00 {
            return Err(InitError::UnsupportedVersion { version });
        }
        if source.layout() != descriptor.layout() {
            return Err(InitError::LayoutMismatch {
                device: descriptor.layout(),
                transport: source.layout(),
            });
        }

        if let Err(e) = source.open() {
            warn!(
                endpoint = %source.endpoint(),
                error = %e,
                "transport unavailable, polling neutral values until it recovers"
            );
        }

        if let Err(e) = host.register_device(&descriptor) {
            host.log(Severity::Error, "Unable to register device");
            source.close();
            return Err(e.into());
        }

        info!(
            device = descriptor.id(),
            channels = descriptor.channel_count(),
            endpoint = %source.endpoint(),
            "input device registered"
        );

        let sampler = FrameSampler::new(&descriptor);
        let mux = IndexMultiplexer::new(descriptor.layout());
        Ok(Self {
            descriptor,
            source,
            sampler,
            mux,
        })
    }

    /// Host polling entry point: one channel per call, `NotFound` once the
    /// frame's channels are exhausted.
    pub fn poll(&mut self, flags: PollFlags) -> Result<InputEvent, NotFound> {
        if flags.first_after_activation() {
            info!("first call after activation");
        }
        let Self {
            source,
            sampler,
            mux,
            ..
        } = self;
        mux.poll(flags, || sampler.sample(source))
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn stats(&self) -> SamplerStats {
        self.sampler.stats()
    }

    /// Close the transport and drop the device.
    pub fn shutdown(self) {
        info!(device = self.descriptor.id(), "shutting down input device");
    }
}

impl<S: ChannelSource> Drop for InputPlugin<S> {
    fn drop(&mut self) {
        self.source.close();
    }
}
