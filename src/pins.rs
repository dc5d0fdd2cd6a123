//! GPIO / peripheral pin assignments for the stove bridge board.
//!
//! Single source of truth: the UART adapter references this module
//! rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Stove link (UART1, to the GSM option board header)
// ---------------------------------------------------------------------------

/// UART1 TX → stove RX.
pub const STOVE_UART_TX_GPIO: i32 = 17;
/// UART1 RX ← stove TX.
pub const STOVE_UART_RX_GPIO: i32 = 16;
