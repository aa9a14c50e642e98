/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

use std::fmt;

use super::packet::KEY_RESPONSE_OPCODE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    IdentityResolving,
    Encryption,
    Unknown(u8),
}

impl KeyKind {
    fn new(code: u8) -> Self {
        match code {
            0x01 => KeyKind::IdentityResolving,
            0x04 => KeyKind::Encryption,
            n => KeyKind::Unknown(n),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            KeyKind::IdentityResolving => 0x01,
            KeyKind::Encryption => 0x04,
            KeyKind::Unknown(n) => *n,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::IdentityResolving => f.write_str("IRK"),
            KeyKind::Encryption => f.write_str("ENC_KEY"),
            KeyKind::Unknown(n) => write!(f, "TYPE_{n:02X}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRecord {
    kind: KeyKind,
    material: Vec<u8>,
}

impl KeyRecord {
    #[inline]
    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    /// Key material, exactly as long as the peer declared for this record.
    #[inline]
    pub fn material(&self) -> &[u8] {
        &self.material
    }
}

/// The key records carried by one key response frame, in wire order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyResponse {
    records: Vec<KeyRecord>,
}

impl KeyResponse {
    /// Decode one inbound frame.
    ///
    /// Returns `None` if the frame is not a key response at all. A frame
    /// that is recognized but declares or carries no usable records decodes
    /// to an empty response, which is a distinct outcome.
    ///
    /// A frame cut short mid-record yields the records decoded up to that
    /// point. The peer declaring more records than it sent is handled the
    /// same way.
    pub fn decode(frame: &[u8]) -> Option<KeyResponse> {
        if frame.len() < 7 {
            return None;
        }
        if frame[4] != KEY_RESPONSE_OPCODE {
            return None;
        }

        let declared = frame[6] as usize;
        let mut records = Vec::with_capacity(declared);
        let mut offset = 7usize;
        for _ in 0..declared {
            if frame.len() - offset < 4 {
                // truncated record header
                break;
            }
            let kind = KeyKind::new(frame[offset]);
            // bytes at offset + 1 and offset + 3 are reserved
            let key_len = frame[offset + 2] as usize;
            offset += 4;
            if key_len > frame.len() - offset {
                // declared length runs past the frame end
                break;
            }
            records.push(KeyRecord {
                kind,
                material: frame[offset..offset + key_len].to_vec(),
            });
            offset += key_len;
        }

        Some(KeyResponse { records })
    }

    #[inline]
    pub fn records(&self) -> &[KeyRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<KeyRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn too_short() {
        assert!(KeyResponse::decode(&[]).is_none());
        assert!(KeyResponse::decode(&hex!("000000003100")).is_none());
    }

    #[test]
    fn opcode_mismatch() {
        // well formed otherwise, but byte 4 is not the key response opcode
        assert!(KeyResponse::decode(&hex!("00000000 30000101 0002AABB")).is_none());
        assert!(KeyResponse::decode(&hex!("31313131 00313131 31313131")).is_none());
    }

    #[test]
    fn single_irk() {
        let rsp = KeyResponse::decode(&hex!("00000000 310001 01000200 AABB")).unwrap();
        assert_eq!(rsp.len(), 1);
        let record = &rsp.records()[0];
        assert_eq!(record.kind(), KeyKind::IdentityResolving);
        assert_eq!(record.material(), &[0xAA, 0xBB]);
    }

    #[test]
    fn material_one_byte_short() {
        // record header is complete but the frame holds one byte less
        // material than declared, so the record is dropped, not truncated
        let rsp = KeyResponse::decode(&hex!("00000000 310001 01000200 AA")).unwrap();
        assert!(rsp.is_empty());
    }

    #[test]
    fn zero_declared_records() {
        let rsp = KeyResponse::decode(&hex!("00000000 310000")).unwrap();
        assert!(rsp.is_empty());
    }

    #[test]
    fn multiple_records_keep_wire_order() {
        let frame = hex!(
            "00000000 310003"
            "04000200 0102"    // ENC_KEY, 2 bytes
            "01000300 A1A2A3"  // IRK, 3 bytes
            "7F000100 FF"      // unrecognized type code
        );
        let rsp = KeyResponse::decode(&frame).unwrap();
        assert_eq!(rsp.len(), 3);
        assert_eq!(rsp.records()[0].kind(), KeyKind::Encryption);
        assert_eq!(rsp.records()[0].material(), &[0x01, 0x02]);
        assert_eq!(rsp.records()[1].kind(), KeyKind::IdentityResolving);
        assert_eq!(rsp.records()[1].material(), &[0xA1, 0xA2, 0xA3]);
        assert_eq!(rsp.records()[2].kind(), KeyKind::Unknown(0x7F));
        assert_eq!(rsp.records()[2].kind().code(), 0x7F);
        assert_eq!(rsp.records()[2].material(), &[0xFF]);
    }

    #[test]
    fn truncated_record_header() {
        // declares 3 records but the frame ends after the second one
        let frame = hex!(
            "00000000 310003"
            "01000200 AABB"
            "04000200 CCDD"
            "0100" // partial header of the third record
        );
        let rsp = KeyResponse::decode(&frame).unwrap();
        assert_eq!(rsp.len(), 2);
        assert_eq!(rsp.records()[1].material(), &[0xCC, 0xDD]);
    }

    #[test]
    fn truncated_material() {
        // second record declares 16 bytes but only 2 are present
        let frame = hex!(
            "00000000 310002"
            "01000200 AABB"
            "04001000 CCDD"
        );
        let rsp = KeyResponse::decode(&frame).unwrap();
        assert_eq!(rsp.len(), 1);
        assert_eq!(rsp.records()[0].kind(), KeyKind::IdentityResolving);
    }

    #[test]
    fn declared_count_caps_decoding() {
        // trailing bytes beyond the declared record count are ignored
        let frame = hex!(
            "00000000 310001"
            "01000200 AABB"
            "04000200 CCDD"
        );
        let rsp = KeyResponse::decode(&frame).unwrap();
        assert_eq!(rsp.len(), 1);
    }

    #[test]
    fn zero_length_material() {
        let rsp = KeyResponse::decode(&hex!("00000000 310001 01000000")).unwrap();
        assert_eq!(rsp.len(), 1);
        assert!(rsp.records()[0].material().is_empty());
    }

    #[test]
    fn decode_is_idempotent() {
        let frame = hex!("00000000 310001 01000200 AABB");
        assert_eq!(KeyResponse::decode(&frame), KeyResponse::decode(&frame));
    }

    #[test]
    fn kind_labels() {
        assert_eq!(KeyKind::IdentityResolving.to_string(), "IRK");
        assert_eq!(KeyKind::Encryption.to_string(), "ENC_KEY");
        assert_eq!(KeyKind::Unknown(0x0A).to_string(), "TYPE_0A");
    }
}
