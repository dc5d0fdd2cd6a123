//! Stove status reply parser.
//!
//! After the `>` prompt the stove sends one free-text status line,
//! terminated by Ctrl-Z. Known shapes:
//!
//! ```text
//! STOVE ON - HEAT 30        power mode, 30 % output
//! STOVE ON - ROOM 22        room mode, 22 °C setpoint
//! STOVE ON - HEAT           mode confirmation without a value
//! STOVE OFF
//! FAILURE: <code or text>
//! ```
//!
//! Every positional access is length-checked; anything that does not fit
//! the shapes above is classified [`StoveReply::Unknown`] instead of
//! faulting.

/// Sub-mode reported in a `STOVE ON` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMode {
    /// Power mode; the value is a heat output percentage.
    Heat,
    /// Room mode; the value is a temperature.
    Room,
    /// Any other mode name, kept verbatim.
    Other(String),
}

impl ReplyMode {
    fn from_token(token: &str) -> Self {
        match token {
            "HEAT" => Self::Heat,
            "ROOM" => Self::Room,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Classified status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoveReply {
    On { mode: ReplyMode, value: Option<i32> },
    Off,
    Failure { reason: String },
    Unknown { raw: String },
}

impl StoveReply {
    /// Parse one status body.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let tokens: Vec<&str> = text.split(' ').filter(|t| !t.is_empty()).collect();
        let unknown = || Self::Unknown {
            raw: text.to_string(),
        };

        match tokens.first().copied() {
            Some("STOVE") => match tokens.get(1).copied() {
                Some("ON") => {
                    // The mode follows an optional "-" separator.
                    let rest = match tokens.get(2).copied() {
                        Some("-") => &tokens[3..],
                        _ => &tokens[2..],
                    };
                    let Some(mode) = rest.first() else {
                        return unknown();
                    };
                    let value = match rest.get(1) {
                        Some(v) => match v.parse::<i32>() {
                            Ok(v) => Some(v),
                            Err(_) => return unknown(),
                        },
                        None => None,
                    };
                    Self::On {
                        mode: ReplyMode::from_token(mode),
                        value,
                    }
                }
                Some("OFF") => Self::Off,
                _ => unknown(),
            },
            Some("FAILURE:") => Self::Failure {
                reason: text["FAILURE:".len()..].trim().to_string(),
            },
            _ => unknown(),
        }
    }
}
