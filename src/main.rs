//! RIKA stove bridge firmware: main entry point.
//!
//! Hexagonal architecture with a single cooperative runtime task.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UartTransport   LogEventSink   NvsAdapter     SystemClock     │
//! │  (Transport)     (EventSink)    (Config+NVS)   (Clock)         │
//! │  LogClimatePublisher (ClimatePort)                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              StoveService (pure logic)                 │    │
//! │  │  ProtocolEngine · StateTranslator · CommandQueue       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Runtime (edge-executor: serial · intents · stats)             │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::{Result, anyhow};
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use rikastove::adapters::log_sink::{LogClimatePublisher, LogEventSink};
use rikastove::adapters::nvs::NvsAdapter;
use rikastove::adapters::time::SystemClock;
use rikastove::adapters::uart::UartTransport;
use rikastove::app::ports::ConfigPort;
use rikastove::app::service::StoveService;
use rikastove::config::StoveConfig;
use rikastove::runtime::{StoveRuntime, task};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RikaStove bridge v{}             ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = NvsAdapter::new().map_err(|e| anyhow!("NVS init failed: {e}"))?;
    let config = match nvs.load() {
        Ok(cfg) => match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                warn!("Stored config invalid ({}), using defaults", e);
                StoveConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            StoveConfig::default()
        }
    };

    // ── 3. Service ────────────────────────────────────────────
    let service = StoveService::new(config.clone());
    service.dump_config();

    // ── 4. Adapters ───────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let uart = UartTransport::new(peripherals.uart1, config.baud_rate)?;

    let runtime = StoveRuntime::new(
        service,
        uart,
        SystemClock::new(),
        LogClimatePublisher::new(),
        LogEventSink::new(),
        nvs,
    );

    // ── 5. Runtime task ───────────────────────────────────────
    let handle = task::spawn(runtime)?;
    info!("Bridge running");

    handle
        .join()
        .map_err(|_| anyhow!("runtime task panicked"))
}
