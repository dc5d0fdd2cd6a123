//! Async runtime task: reactor-driven serial and intent loops.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! multi-task scheduling and `async-io-mini` for reactor-driven timers
//! (no busy-spinning). Three concurrent futures:
//!
//! 1. **Serial**: polls the UART every `poll_interval_ms` via reactor timer
//! 2. **Intents**: truly async via `INTENT_CHANNEL.receive().await`
//!    (wakes instantly when a control call is submitted)
//! 3. **Stats**: logs the diagnostics counters when they change
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │  Runtime Thread                                          │
//!  │  ┌────────────────────────────────────────────────────┐  │
//!  │  │  futures_lite::block_on                            │  │
//!  │  │  ┌──────────────────────────────────────────────┐  │  │
//!  │  │  │  edge_executor::LocalExecutor                │  │  │
//!  │  │  │                                              │  │  │
//!  │  │  │  ┌─────────┐  ┌──────────────┐  ┌─────────┐  │  │  │
//!  │  │  │  │ Serial  │  │   Intents    │  │  Stats  │  │  │  │
//!  │  │  │  │ 10ms ⏱  │  │ wake-on-send │  │ 60s ⏱   │  │  │  │
//!  │  │  │  └─────────┘  └──────────────┘  └─────────┘  │  │  │
//!  │  │  └──────────────────────────────────────────────┘  │  │
//!  │  └────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A status body wait never blocks this thread: the engine parks in its
//! `AwaitingBody` sub-state and the serial loop keeps yielding between
//! ticks, so intents are still accepted while the stove is mid-report.

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;

use log::{info, warn};

use crate::app::ports::{ClimatePort, Clock, EventSink, StoragePort};
use crate::protocol::transport::Transport;

use super::StoveRuntime;
use super::channels::INTENT_CHANNEL;
use super::task_pin::{Core, spawn_on_core};

const STATS_INTERVAL: Duration = Duration::from_secs(60);

type Shared<T, C, P, E, S> = Rc<RefCell<StoveRuntime<T, C, P, E, S>>>;

/// Serial task: drains the UART at a fixed interval. The reactor timer
/// is wake-based (not thread::sleep), so the executor can service the
/// intent task between ticks.
async fn serial_loop<T, C, P, E, S>(runtime: Shared<T, C, P, E, S>, interval: Duration)
where
    T: Transport,
    C: Clock,
    P: ClimatePort,
    E: EventSink,
    S: StoragePort,
{
    loop {
        if let Err(e) = runtime.borrow_mut().poll_serial() {
            warn!("Runtime: serial poll failed: {}", e);
        }
        async_io_mini::Timer::after(interval).await;
    }
}

/// Intent task: wakes instantly when `submit_intent()` is called.
async fn intent_loop<T, C, P, E, S>(runtime: Shared<T, C, P, E, S>)
where
    T: Transport,
    C: Clock,
    P: ClimatePort,
    E: EventSink,
    S: StoragePort,
{
    loop {
        let call = INTENT_CHANNEL.receive().await;
        runtime.borrow_mut().handle_intent(call);
    }
}

async fn stats_loop<T, C, P, E, S>(runtime: Shared<T, C, P, E, S>)
where
    T: Transport,
    C: Clock,
    P: ClimatePort,
    E: EventSink,
    S: StoragePort,
{
    loop {
        async_io_mini::Timer::after(STATS_INTERVAL).await;
        runtime.borrow_mut().report_stats();
    }
}

/// Start the service and run the runtime loops forever on this thread.
pub fn run<T, C, P, E, S>(runtime: StoveRuntime<T, C, P, E, S>)
where
    T: Transport + 'static,
    C: Clock + 'static,
    P: ClimatePort + 'static,
    E: EventSink + 'static,
    S: StoragePort + 'static,
{
    let interval = Duration::from_millis(u64::from(
        runtime.service().config().poll_interval_ms.max(1),
    ));
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

    let runtime: Shared<T, C, P, E, S> = Rc::new(RefCell::new(runtime));
    runtime.borrow_mut().start();

    executor
        .spawn(serial_loop(runtime.clone(), interval))
        .detach();
    executor.spawn(intent_loop(runtime.clone())).detach();
    executor.spawn(stats_loop(runtime.clone())).detach();

    info!(
        "Runtime started (async, reactor-driven, poll every {}ms)",
        interval.as_millis()
    );

    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

/// Spawn the runtime in a dedicated thread pinned to Core 1 (APP_CPU).
pub fn spawn<T, C, P, E, S>(
    runtime: StoveRuntime<T, C, P, E, S>,
) -> std::io::Result<std::thread::JoinHandle<()>>
where
    T: Transport + Send + 'static,
    C: Clock + Send + 'static,
    P: ClimatePort + Send + 'static,
    E: EventSink + Send + 'static,
    S: StoragePort + Send + 'static,
{
    spawn_on_core(Core::App, 10, 12, "stove-uart\0", move || run(runtime))
}
