use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What kind of pool this is. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolType {
    /// Anyone writes, anyone reads
    Wall,
    /// Writer key holders write, anyone reads
    Channel,
    /// Writer key holders write, reader key holders read
    Chat,
    /// Anyone writes, reader key holders read
    Mailbox,
}

impl PoolType {
    pub const ALL: [PoolType; 4] = [
        PoolType::Wall,
        PoolType::Channel,
        PoolType::Chat,
        PoolType::Mailbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolType::Wall => "wall",
            PoolType::Channel => "channel",
            PoolType::Chat => "chat",
            PoolType::Mailbox => "mailbox",
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wall" => Ok(PoolType::Wall),
            "channel" => Ok(PoolType::Channel),
            "chat" => Ok(PoolType::Chat),
            "mailbox" => Ok(PoolType::Mailbox),
            other => Err(format!("unknown pool type: {}", other)),
        }
    }
}

/// Declared form of a message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Plaintext,
    Encrypted,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Plaintext => "plaintext",
            MessageKind::Encrypted => "encrypted",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plaintext" => Ok(MessageKind::Plaintext),
            "encrypted" => Ok(MessageKind::Encrypted),
            other => Err(format!("unknown message type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_type_parse_display() {
        for pool_type in PoolType::ALL {
            assert_eq!(pool_type.to_string().parse::<PoolType>().unwrap(), pool_type);
        }
        assert!("tunnel".parse::<PoolType>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&PoolType::Mailbox).unwrap(), "\"mailbox\"");
        assert_eq!(
            serde_json::from_str::<MessageKind>("\"encrypted\"").unwrap(),
            MessageKind::Encrypted
        );
    }
}
