//! sprinklerd — controller daemon entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter     FileStore      TcpHttpClient            │
//! │  (Actuator+Sensor)   (Storage)      (Network)                │
//! │  LogEventSink ─┬─ InfluxSink        SystemClock              │
//! │  (EventSink)   │  (EventSink)                                │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            Controller (pure logic)                      │  │
//! │  │  options · stations · dispatch · sensors               │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `sprinklerd [config.json]`.  Log filter comes from
//! `SPRINKLER_LOG`, then `RUST_LOG`, default `info`.

use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use sprinkler::adapters::hardware::HardwareAdapter;
use sprinkler::adapters::http_client::TcpHttpClient;
use sprinkler::adapters::influx::InfluxSink;
use sprinkler::adapters::log_sink::{FanOut, LogEventSink};
use sprinkler::adapters::store::FileStore;
use sprinkler::adapters::time::SystemClock;
use sprinkler::app::ports::{ActuatorPort, SensorPort};
use sprinkler::config::ControllerConfig;
use sprinkler::options::Capacity;
use sprinkler::{Controller, Error};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SPRINKLER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn load_config() -> Result<ControllerConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            let cfg = ControllerConfig::load(path)
                .map_err(Error::from)
                .with_context(|| format!("loading {}", path.display()))?;
            info!("Config loaded from {}", path.display());
            Ok(cfg)
        }
        None => {
            info!("No config file given, using defaults");
            Ok(ControllerConfig::default())
        }
    }
}

fn run(config: &ControllerConfig, hw: &mut (impl ActuatorPort + SensorPort)) -> Result<()> {
    let store = FileStore::open(&config.data_dir)
        .map_err(Error::from)
        .with_context(|| format!("opening data dir {}", config.data_dir.display()))?;
    let mut controller = Controller::new(store, Capacity::new(config.max_stations))
        .with_timeout(Duration::from_millis(config.http_timeout_ms));

    let mut sink = FanOut {
        first: LogEventSink::new(),
        second: config
            .telemetry
            .as_ref()
            .map(|t| InfluxSink::new(TcpHttpClient::new(), t)),
    };
    let mut net = TcpHttpClient::new();
    let clock = SystemClock::new();

    // Without a consistent store there is nothing safe to drive.
    controller.bootstrap(&mut sink).context("bootstrap failed")?;
    controller
        .begin(clock.now_secs(), &mut *hw, &mut net, &mut sink)
        .map_err(Error::from)
        .context("station bus power-up failed")?;

    info!(
        "System ready: {} stations on {} boards. Entering control loop.",
        controller.options().nstations(),
        controller.options().nboards()
    );

    let interval = Duration::from_millis(config.poll_interval_ms);
    loop {
        let now = clock.now_secs();

        for ch in controller.poll_sensors(now, &mut *hw, &mut sink) {
            info!("Program switch {:?} pressed (no program runner attached)", ch);
        }

        let local = controller.options().now_tz(now as i64);
        if controller.status().rain_delayed && local >= i64::from(controller.nvdata().rd_stop_time) {
            info!("Rain delay expired");
            if let Err(e) = controller.raindelay_stop() {
                warn!("Rain delay stop not persisted: {}", e);
            }
        }

        if let Err(e) = controller.apply_all_station_bits(now, &mut *hw, &mut net) {
            warn!("Station bus push failed: {}", e);
        }

        thread::sleep(interval);
    }
}

fn main() -> Result<()> {
    init_tracing();
    info!("sprinklerd v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    #[cfg(feature = "hardware")]
    let mut hw = HardwareAdapter::open_cdev(&config.gpio_chip, &config.pins, config.legacy_data_pin)
        .map_err(Error::from)
        .with_context(|| format!("opening {}", config.gpio_chip))?;
    #[cfg(not(feature = "hardware"))]
    let mut hw = HardwareAdapter::simulated(
        &config.pins,
        config.legacy_data_pin,
        &sprinkler::drivers::sim::PinLog::bounded(4096),
    );

    hw.init().map_err(Error::from).context("station bus init failed")?;
    run(&config, &mut hw)
}
