//! Cross-task signalling into the runtime.
//!
//! Uses `embassy-sync` primitives so any thread (API handler, button
//! task, test harness) can reach the runtime without touching the queue
//! or the climate state directly. Both are static and heap-free.
//!
//! ```text
//! ┌──────────────┐ ClimateCall  ┌──────────────┐
//! │ Control API  │─────────────▶│   Runtime    │
//! │ (any thread) │─────────────▶│  (executor)  │
//! └──────────────┘ cancel body  └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use log::warn;

use crate::app::commands::ClimateCall;

/// Channel depth for control intents.
const INTENT_DEPTH: usize = 4;

/// Inbound control intents: control surface → runtime.
pub static INTENT_CHANNEL: Channel<CriticalSectionRawMutex, ClimateCall, INTENT_DEPTH> =
    Channel::new();

/// Request to abort an in-progress status body wait.
pub static CANCEL_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Hand a control event to the runtime. Returns `false` if the channel
/// is full and the intent was dropped.
pub fn submit_intent(call: ClimateCall) -> bool {
    if INTENT_CHANNEL.try_send(call).is_err() {
        warn!("Runtime: intent channel full, dropping control call");
        return false;
    }
    true
}

/// Ask the runtime to abandon the current `AT+CMGS` body wait. Takes
/// effect on the next serial poll; a no-op if no wait is in progress.
pub fn cancel_body_wait() {
    CANCEL_SIGNAL.signal(());
}

/// Take the next pending intent without waiting.
pub fn try_recv_intent() -> Option<ClimateCall> {
    INTENT_CHANNEL.try_receive().ok()
}

/// Consume a pending cancel request, if any.
pub(crate) fn take_cancel_request() -> bool {
    CANCEL_SIGNAL.try_take().is_some()
}
