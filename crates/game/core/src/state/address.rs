use std::fmt;
use std::str::FromStr;

use crate::error::LifecycleError;

/// EVM-style account address identifying a player.
///
/// Always stored lowercase so `0xABC…` and `0xabc…` are the same roster entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct PlayerAddress(String);

impl PlayerAddress {
    const HEX_LEN: usize = 40;

    /// Parses and normalizes an address.
    pub fn parse(raw: &str) -> Result<Self, LifecycleError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| LifecycleError::InvalidAddress(raw.to_string()))?;

        if digits.len() != Self::HEX_LEN || hex::decode(digits).is_err() {
            return Err(LifecycleError::InvalidAddress(raw.to_string()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PlayerAddress {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlayerAddress {
    type Error = LifecycleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerAddress> for String {
    fn from(address: PlayerAddress) -> Self {
        address.0
    }
}

impl fmt::Display for PlayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
