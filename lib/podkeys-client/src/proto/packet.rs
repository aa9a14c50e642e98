/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

use hex_literal::hex;

/// L2CAP PSM the proximity key service listens on.
pub const PROXIMITY_PSM: u16 = 0x1001;

/// Opcode at byte 4 of an inbound frame carrying key records.
pub const KEY_RESPONSE_OPCODE: u8 = 0x31;

/// Fixed handshake PDU, sent once after the channel opens.
pub const HANDSHAKE: [u8; 16] = hex!("00000400 01000200 00000000 00000000");

/// Fixed key request PDU, sent once after the settle interval.
pub const KEY_REQUEST: [u8; 8] = hex!("04000400 30000500");
