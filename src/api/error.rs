// src/api/error.rs
//! Classified request failures, shaped for what the console shows the user.

use thiserror::Error;

/// Status reported when no response arrived at all.
pub const NETWORK_STATUS: i32 = -1;

pub const MSG_NETWORK: &str = "Network Error or server offline";
pub const MSG_NO_BODY: &str = "The server encountered a problem handling the request";
pub const CODE_NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure: connect refused, DNS, timeout. No response received.
    #[error("request failed before a response arrived: {reason}")]
    Network { reason: String },

    /// A response arrived but carried no body.
    #[error("HTTP {status} with empty body")]
    EmptyBody { status: u16 },

    /// A response arrived but its body could not be decoded.
    #[error("HTTP {status} with undecodable body: {detail}")]
    Malformed { status: u16, detail: String },

    /// Well-formed non-2xx response.
    #[error("HTTP {status} {status_text}")]
    Status { status: u16, status_text: String },
}

impl FetchError {
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    /// Numeric status, `-1` when nothing was received.
    pub fn status(&self) -> i32 {
        match self {
            Self::Network { .. } => NETWORK_STATUS,
            Self::EmptyBody { status }
            | Self::Malformed { status, .. }
            | Self::Status { status, .. } => i32::from(*status),
        }
    }

    pub fn has_response(&self) -> bool {
        !matches!(self, Self::Network { .. })
    }

    /// Code column: `N/A` without a response, the status code otherwise.
    pub fn code(&self) -> String {
        if self.has_response() {
            self.status().to_string()
        } else {
            CODE_NOT_AVAILABLE.to_string()
        }
    }

    /// Human explanation of the failure.
    pub fn explanation(&self) -> String {
        if self.status() == NETWORK_STATUS {
            return MSG_NETWORK.to_string();
        }
        match self {
            Self::EmptyBody { .. } | Self::Malformed { .. } => MSG_NO_BODY.to_string(),
            Self::Status { status_text, .. } => status_text.clone(),
            Self::Network { .. } => MSG_NETWORK.to_string(),
        }
    }
}
