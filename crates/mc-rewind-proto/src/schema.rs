//! The two protocol versions bridged by the rewriter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A play-state schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Schema {
    /// Java Edition 1.13.2 (protocol 404), spoken by the peer.
    V1_13_2,
    /// Java Edition 1.14 (protocol 477), spoken by the backend.
    V1_14,
}

impl Schema {
    pub fn protocol_version(self) -> i32 {
        match self {
            Schema::V1_13_2 => 404,
            Schema::V1_14 => 477,
        }
    }

    /// Highest entity metadata type id the schema can encode.
    pub fn max_meta_type(self) -> u8 {
        match self {
            Schema::V1_13_2 => 15,
            Schema::V1_14 => 18,
        }
    }

    /// Particle ids whose payload carries extra data.
    pub fn particle_ids(self) -> ParticleIds {
        match self {
            Schema::V1_13_2 => ParticleIds {
                block: 3,
                dust: 11,
                falling_dust: 20,
                item: 27,
            },
            Schema::V1_14 => ParticleIds {
                block: 3,
                dust: 14,
                falling_dust: 23,
                item: 32,
            },
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::V1_13_2 => write!(f, "1.13.2"),
            Schema::V1_14 => write!(f, "1.14"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleIds {
    pub block: i32,
    pub dust: i32,
    pub falling_dust: i32,
    pub item: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_versions() {
        assert_eq!(Schema::V1_13_2.protocol_version(), 404);
        assert_eq!(Schema::V1_14.protocol_version(), 477);
    }

    #[test]
    fn legacy_schema_knows_fewer_meta_types() {
        assert!(Schema::V1_13_2.max_meta_type() < Schema::V1_14.max_meta_type());
    }

    #[test]
    fn display() {
        assert_eq!(Schema::V1_14.to_string(), "1.14");
        assert_eq!(Schema::V1_13_2.to_string(), "1.13.2");
    }
}
