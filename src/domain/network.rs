//! Address-prefix network sniffing for withdrawal rows.
//!
//! The withdrawal DTO carries only a destination address, so the network
//! and asset shown in the console are guessed from the address shape.
//! The guess is a display hint: it must never drive routing, signing, or
//! any security decision.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// Network label shown next to a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Network {
    /// `0x`-prefixed EVM address.
    Ethereum,
    /// `T`-prefixed Tron address.
    #[serde(rename = "TRC20")]
    Trc20,
    /// `bc1`, `1` or `3`-prefixed address.
    Bitcoin,
    /// Anything else, including an empty address.
    Unknown,
}

impl Network {
    /// Label as rendered in the console.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Trc20 => "TRC20",
            Self::Bitcoin => "Bitcoin",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder the console shows for a missing address.
pub const MISSING_ADDRESS: &str = "—";

/// Guesses the network from the address prefix.
#[must_use]
pub fn infer_network(address: &str) -> Network {
    if address.is_empty() || address == MISSING_ADDRESS {
        return Network::Unknown;
    }
    if address.starts_with("0x") {
        Network::Ethereum
    } else if address.starts_with('T') {
        Network::Trc20
    } else if address.starts_with("bc1") || address.starts_with('1') || address.starts_with('3') {
        Network::Bitcoin
    } else {
        Network::Unknown
    }
}

/// Asset ticker implied by a network guess; USDT when nothing better fits.
#[must_use]
pub const fn infer_asset(network: Network) -> &'static str {
    match network {
        Network::Bitcoin => "BTC",
        Network::Ethereum => "ETH",
        Network::Trc20 | Network::Unknown => "USDT",
    }
}
