//! Test producer: sweeps the steering axis back and forth so the values can
//! be watched arriving on the host side.
//!
//! ```bash
//! feeder [config.toml]
//! ```
//!
//! With a shm transport it waits for the plugin to create the region and
//! writes into it. With a socket transport it listens on the configured
//! address and streams frames to whoever connects.

use anyhow::{Context, bail};
use ctrlrelay_config::{RelayConfig, TransportConfig};
use ctrlrelay_events::{ByteOrder, ChannelKind, FrameLayout, Snapshot};
use ctrlrelay_mmap::MmapFileMut;
use std::io::Write;
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::ptr;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Triangle wave between -1 and 1.
struct Sweep {
    value: f32,
    step: f32,
    falling: bool,
}

impl Sweep {
    fn new(step: f32) -> Self {
        Self {
            value: -1.0,
            step,
            falling: false,
        }
    }

    fn next(&mut self) -> f32 {
        let out = self.value;
        if self.falling {
            self.value -= self.step;
        } else {
            self.value += self.step;
        }
        if self.value > 1.0 {
            self.falling = true;
        } else if self.value < -1.0 {
            self.falling = false;
        }
        out
    }
}

struct Feeder {
    layout: FrameLayout,
    steering: Option<usize>,
    sweep: Sweep,
    interval: Duration,
}

impl Feeder {
    fn new(cfg: &RelayConfig) -> Self {
        let channels = cfg.channels();
        let floats: Vec<_> = channels
            .iter()
            .filter(|c| c.kind == ChannelKind::Float)
            .collect();
        let layout = FrameLayout::new(floats.len(), channels.len() - floats.len());
        let steering = floats.iter().position(|c| c.id == "steering");

        Self {
            layout,
            steering,
            sweep: Sweep::new(cfg.feeder.step),
            interval: Duration::from_millis(cfg.feeder.interval_ms),
        }
    }

    fn next_frame(&mut self, order: ByteOrder) -> anyhow::Result<Vec<u8>> {
        let mut snap = Snapshot::neutral(self.layout);
        let v = self.sweep.next();
        if let Some(i) = self.steering {
            snap.floats[i] = v;
        }
        Ok(self.layout.encode(&snap, order)?)
    }

    fn run_shm(&mut self, path: &Path) -> anyhow::Result<()> {
        info!(path = %path.display(), "FEEDER: waiting for shared memory from the plugin");
        let mut region = loop {
            match MmapFileMut::open_rw(path) {
                Ok(r) if r.len() >= self.layout.len() => break r,
                Ok(r) => {
                    bail!(
                        "region {} is {} bytes, frames need {}",
                        path.display(),
                        r.len(),
                        self.layout.len()
                    );
                }
                Err(_) => std::thread::sleep(Duration::from_millis(100)),
            }
        };
        info!("FEEDER: shared memory mapped");

        let mut count: u64 = 0;
        let mut last = Instant::now();
        loop {
            let frame = self.next_frame(ByteOrder::Native)?;
            let base = region.as_mut_ptr();
            for (i, b) in frame.iter().enumerate() {
                // SAFETY: frame.len() == layout.len() <= region.len(), checked above.
                unsafe { ptr::write_volatile(base.add(i), *b) };
            }
            count += 1;

            if last.elapsed() >= Duration::from_secs(1) {
                info!(steering = self.sweep.value, "FEEDER: write rate ~ {count} frames/s");
                count = 0;
                last = Instant::now();
            }
            std::thread::sleep(self.interval);
        }
    }

    fn run_socket(&mut self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).with_context(|| format!("binding {addr}"))?;
        info!(%addr, "FEEDER: listening");

        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "FEEDER: accept failed");
                    continue;
                }
            };
            let peer = stream.peer_addr().ok();
            info!(?peer, "FEEDER: client connected");
            let _ = stream.set_nodelay(true);

            loop {
                let frame = self.next_frame(ByteOrder::Little)?;
                if let Err(e) = stream.write_all(&frame) {
                    info!(?peer, error = %e, "FEEDER: client gone");
                    break;
                }
                std::thread::sleep(self.interval);
            }
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => RelayConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => RelayConfig::default(),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut feeder = Feeder::new(&cfg);
    if feeder.steering.is_none() {
        warn!("FEEDER: no steering channel configured, sending neutral frames");
    }

    match &cfg.transport {
        TransportConfig::Shm { path } => feeder.run_shm(path),
        TransportConfig::Socket { addr, .. } => feeder.run_socket(*addr),
    }
}
