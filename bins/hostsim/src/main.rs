//! Stand-in for the game: loads the plugin, registers it and polls it once
//! per frame the way the host's input loop does.
//!
//! ```bash
//! hostsim [config.toml] [frames]
//! ```

use anyhow::Context;
use ctrlrelay_config::RelayConfig;
use ctrlrelay_engine::{
    DeviceDescriptor, Host, INPUT_API_VERSION_1_00, InputPlugin, PollFlags, RegistrationError,
    Severity, descriptor_from_config, transport_from_config,
};
use ctrlrelay_events::ChannelValue;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Host services backed by the process log.
struct TracingHost;

impl Host for TracingHost {
    fn register_device(&mut self, descriptor: &DeviceDescriptor) -> Result<(), RegistrationError> {
        for (index, ch) in descriptor.describe().iter().enumerate() {
            info!(index, id = %ch.id, name = %ch.display_name, kind = ?ch.kind, "input");
        }
        info!(
            device = descriptor.id(),
            name = descriptor.display_name(),
            category = ?descriptor.category(),
            "HOSTSIM: device registered"
        );
        Ok(())
    }

    fn log(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Message => info!(target: "host", "{message}"),
            Severity::Warning => warn!(target: "host", "{message}"),
            Severity::Error => error!(target: "host", "{message}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let cfg = match args.next() {
        Some(path) => RelayConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => RelayConfig::default(),
    };
    let max_frames: Option<u64> = args
        .next()
        .map(|s| s.parse())
        .transpose()
        .context("frame count must be a non-negative integer")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let descriptor = descriptor_from_config(&cfg)?;
    let transport = transport_from_config(&cfg.transport, descriptor.layout());
    info!(transport = transport.name(), "HOSTSIM: loading input plugin");

    let mut plugin =
        InputPlugin::init(INPUT_API_VERSION_1_00, descriptor, transport, &mut TracingHost)
            .context("input plugin failed to initialize")?;

    let frame_time = Duration::from_secs_f64(1.0 / f64::from(cfg.hostsim.frame_hz.max(1)));
    let mut last_report = Instant::now();
    let mut frames: u64 = 0;
    let mut flags = PollFlags::FIRST_AFTER_ACTIVATION | PollFlags::FIRST_IN_FRAME;

    while max_frames.is_none_or(|max| frames < max) {
        let started = Instant::now();

        let mut values = Vec::with_capacity(plugin.descriptor().channel_count());
        while let Ok(ev) = plugin.poll(flags) {
            values.push(ev);
            flags = PollFlags::NONE;
        }
        flags = PollFlags::FIRST_IN_FRAME;
        frames += 1;

        if last_report.elapsed() >= Duration::from_secs(1) {
            let line = values
                .iter()
                .map(|ev| {
                    let id = plugin
                        .descriptor()
                        .channel(ev.index as usize)
                        .map_or("?", |c| c.id.as_str());
                    match ev.value {
                        ChannelValue::Float(v) => format!("{id}={v:+.3}"),
                        ChannelValue::Bool(b) => format!("{id}={}", u8::from(b)),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            let stats = plugin.stats();
            info!(
                frames,
                failures = stats.failures,
                outages = stats.outages,
                "HOSTSIM: {line}"
            );
            last_report = Instant::now();
        }

        if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    plugin.shutdown();
    Ok(())
}
