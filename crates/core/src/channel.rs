//! Sales channels.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Sales platform an order was placed through.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    Shopee,
    Lazada,
    Tiktok,
    LineOA,
    Facebook,
    LineShopping,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Shopee,
        Channel::Lazada,
        Channel::Tiktok,
        Channel::LineOA,
        Channel::Facebook,
        Channel::LineShopping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Shopee => "Shopee",
            Channel::Lazada => "Lazada",
            Channel::Tiktok => "Tiktok",
            Channel::LineOA => "LineOA",
            Channel::Facebook => "Facebook",
            Channel::LineShopping => "LineShopping",
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::invalid_id(format!("Channel: {s:?}")))
    }
}
