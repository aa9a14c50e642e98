/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

use std::error::Error;

use async_trait::async_trait;

/// One already-open point-to-point channel to the peer device.
///
/// Link setup is the backend's concern: the channel is expected to be
/// connected, authenticated and encrypted before the exchange starts, and
/// closing it is the caller's job once the exchange returns. The exchange
/// engine only moves whole PDUs across it.
#[async_trait]
pub trait ProximityChannel {
    type Error: Error;

    /// Send one opaque PDU.
    async fn send_pdu(&mut self, pdu: &[u8]) -> Result<(), Self::Error>;

    /// Receive the next inbound frame. Frames must be delivered one per
    /// call, in arrival order.
    async fn recv_pdu(&mut self) -> Result<Vec<u8>, Self::Error>;
}
