use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Query types the gateway distinguishes. Anything else is carried as
/// `Other` so the responder can report it back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    NS,
    Other(u16),
}

impl RecordType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => RecordType::A,
            28 => RecordType::AAAA,
            2 => RecordType::NS,
            other => RecordType::Other(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::AAAA => 28,
            RecordType::NS => 2,
            RecordType::Other(value) => value,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::AAAA => write!(f, "AAAA"),
            RecordType::NS => write!(f, "NS"),
            RecordType::Other(value) => write!(f, "TYPE{}", value),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::AAAA),
            "NS" => Ok(RecordType::NS),
            other => other
                .strip_prefix("TYPE")
                .and_then(|n| n.parse::<u16>().ok())
                .map(RecordType::from_u16)
                .ok_or_else(|| format!("Unknown record type: {}", s)),
        }
    }
}

/// A delegation record as returned by an NS lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsRecord {
    pub nameserver: Arc<str>,
    pub ttl: u32,
}

impl NsRecord {
    pub fn new(nameserver: impl Into<Arc<str>>, ttl: u32) -> Self {
        Self {
            nameserver: nameserver.into(),
            ttl,
        }
    }
}
