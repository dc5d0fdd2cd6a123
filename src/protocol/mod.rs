//! Modem emulation layer.
//!
//! The stove's GSM option board believes it is driving a cellular modem.
//! This module answers it, byte for byte.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Protocol Stack                         │
//! │                                                            │
//! │  ┌───────────┐   ┌──────────┐   ┌───────────────────────┐  │
//! │  │ Transport │──▶│  Framer  │──▶│  Engine (AT dispatch) │  │
//! │  │ (UART)    │   │ (CR)     │   │  → ReplyParser        │  │
//! │  └───────────┘   └──────────┘   └───────────────────────┘  │
//! │       ▲                                    │               │
//! │       │              ┌─────────────────────┘               │
//! │       │              ▼                                     │
//! │  ┌───────────┐   ┌──────────┐   ┌───────────────────────┐  │
//! │  │ Transport │◀──│  Queue   │◀──│  Translator           │  │
//! │  │ (write)   │   │ (FIFO)   │   │  ← climate intents    │  │
//! │  └───────────┘   └──────────┘   └───────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod framer;
pub mod queue;
pub mod reply;
pub mod translate;
pub mod transport;

pub use engine::{EngineState, ProtocolEngine, SessionSettings};
pub use framer::LineFramer;
pub use queue::CommandQueue;
pub use reply::{ReplyMode, StoveReply};
pub use translate::{StateTranslator, StoveCommand, StoveMode};
pub use transport::Transport;
