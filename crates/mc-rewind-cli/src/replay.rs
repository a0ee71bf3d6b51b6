//! Replaying JSON-lines packet captures through a [`Protocol`].
//!
//! Each line is one clientbound packet: `{"id": 67, "payload": "<base64>"}`.
//! A capture is one connection, so it gets its own [`ConnectionContext`].

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mc_rewind_core::{ConnectionContext, Protocol};
use mc_rewind_proto::Packet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
    #[error("line {line}: bad payload: {source}")]
    Payload {
        line: usize,
        source: base64::DecodeError,
    },
    #[error("encoding capture: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct CaptureRecord {
    id: u32,
    payload: String,
}

/// Counters for one replayed capture.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub input: usize,
    pub output: usize,
    /// Input packets whose own rewrite was cancelled or failed.
    pub dropped: usize,
    /// Companion packets queued around a rewrite.
    pub synthesized: usize,
    pub tracked_at_end: usize,
    pub position_anomalies: u64,
}

pub fn parse_capture(text: &str) -> Result<Vec<Packet>, ReplayError> {
    let mut packets = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: CaptureRecord =
            serde_json::from_str(line).map_err(|source| ReplayError::Json { line: n + 1, source })?;
        let payload = STANDARD
            .decode(&record.payload)
            .map_err(|source| ReplayError::Payload { line: n + 1, source })?;
        packets.push(Packet::new(record.id, payload));
    }
    Ok(packets)
}

pub fn encode_capture(packets: &[Packet]) -> Result<String, ReplayError> {
    let mut out = String::new();
    for packet in packets {
        let record = CaptureRecord {
            id: packet.id,
            payload: STANDARD.encode(&packet.payload),
        };
        out.push_str(&serde_json::to_string(&record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Feed `packets` through `protocol` in order, as one connection.
pub fn replay(protocol: &Protocol, packets: Vec<Packet>) -> (Vec<Packet>, ReplayStats) {
    let mut conn = ConnectionContext::new();
    let mut stats = ReplayStats {
        input: packets.len(),
        ..ReplayStats::default()
    };
    let mut output = Vec::with_capacity(packets.len());
    for packet in packets {
        let rewritten = protocol.rewrite(&mut conn, packet);
        if rewritten.primary.is_none() {
            stats.dropped += 1;
        }
        stats.synthesized += rewritten.before.len() + rewritten.after.len();
        output.extend(rewritten.into_packets());
    }
    stats.output = output.len();
    stats.tracked_at_end = conn.tracked_entities();
    stats.position_anomalies = conn.position_anomalies();
    (output, stats)
}

/// Replay one capture file, writing the result to `output_dir` when given.
pub fn replay_file(
    protocol: &Protocol,
    capture: &Path,
    output_dir: Option<&Path>,
) -> Result<ReplayStats, ReplayError> {
    let text = std::fs::read_to_string(capture).map_err(|source| ReplayError::Io {
        path: capture.to_path_buf(),
        source,
    })?;
    let packets = parse_capture(&text)?;
    debug!("{}: {} packets", capture.display(), packets.len());
    let (output, stats) = replay(protocol, packets);

    if let Some(dir) = output_dir {
        let name = capture.file_name().unwrap_or(capture.as_os_str());
        let path = dir.join(name);
        std::fs::write(&path, encode_capture(&output)?)
            .map_err(|source| ReplayError::Io { path: path.clone(), source })?;
        info!("wrote {}", path.display());
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::{BufMut, BytesMut};
    use mc_rewind_core::enchantment::EnchantmentRewriter;
    use mc_rewind_core::protocol::ids::newer;
    use mc_rewind_core::{protocol_1_13_2_to_1_14, MappingTables, RecordingSink};

    use super::*;

    fn protocol() -> Protocol {
        let tables = Arc::new(MappingTables::from_json(r#"{ "sounds": { "800": 780 } }"#).unwrap());
        protocol_1_13_2_to_1_14(tables, EnchantmentRewriter::default(), Arc::new(RecordingSink::new()))
    }

    #[test]
    fn capture_lines_decode() {
        let text = "{\"id\":26,\"payload\":\"AQI=\"}\n\n{\"id\":3,\"payload\":\"\"}\n";
        let packets = parse_capture(text).unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].id, 26);
        assert_eq!(&packets[0].payload[..], &[1, 2]);
        assert!(packets[1].payload.is_empty());
        assert_eq!(encode_capture(&packets).unwrap(), text.replace("\n\n", "\n"));
    }

    #[test]
    fn bad_line_reports_line_number() {
        let err = parse_capture("{\"id\":1,\"payload\":\"\"}\nnot json").unwrap_err();
        assert!(matches!(err, ReplayError::Json { line: 2, .. }));

        let err = parse_capture("{\"id\":1,\"payload\":\"%%\"}").unwrap_err();
        assert!(matches!(err, ReplayError::Payload { line: 1, .. }));
    }

    #[test]
    fn replay_counts_drops_and_passthrough() {
        let protocol = protocol();
        let mut sound = BytesMut::new();
        // sound 800, category 0, entity 9, volume, pitch; entity 9 unknown
        sound.put_slice(&[0xA0, 0x06, 0x00, 0x09]);
        sound.put_f32(1.0);
        sound.put_f32(1.0);

        let packets = vec![
            Packet::new(0x7F, vec![1, 2, 3]),
            Packet::new(newer::ENTITY_SOUND_EFFECT, sound.freeze()),
        ];
        let (output, stats) = replay(&protocol, packets);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].id, 0x7F);
        assert_eq!(stats.input, 2);
        assert_eq!(stats.output, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.synthesized, 0);
    }

    #[test]
    fn entity_sound_counts_as_dropped_and_synthesized() {
        let protocol = protocol();
        let mut orb = BytesMut::new();
        orb.put_u8(0x09);
        orb.put_f64(1.0);
        orb.put_f64(64.0);
        orb.put_f64(-2.0);
        orb.put_i16(3);
        let mut sound = BytesMut::new();
        sound.put_slice(&[0xA0, 0x06, 0x00, 0x09]);
        sound.put_f32(1.0);
        sound.put_f32(1.0);

        let packets = vec![
            Packet::new(newer::SPAWN_EXPERIENCE_ORB, orb.freeze()),
            Packet::new(newer::ENTITY_SOUND_EFFECT, sound.freeze()),
        ];
        let (output, stats) = replay(&protocol, packets);
        assert_eq!(output.len(), 2);
        assert_eq!(stats.output, 2);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.synthesized, 1);
        assert_eq!(stats.tracked_at_end, 1);
    }
}
