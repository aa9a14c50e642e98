/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

use thiserror::Error;
use tokio::time::Instant;

use crate::channel::ProximityChannel;
use crate::config::ProximityExchangeConfig;
use crate::log_msg;
use crate::proto::KeyResponse;
use crate::proto::packet;

#[derive(Debug, Error)]
pub enum ProximityExchangeError<E: std::error::Error> {
    #[error("timed out waiting for a key response")]
    ResponseTimeout,
    #[error("channel failed: {0}")]
    Channel(E),
}

/// Run one key exchange over an already-open channel.
///
/// Sends the handshake, waits out the settle interval, sends the key
/// request, then reads frames until one decodes to a non-empty key set or
/// the response budget runs out. Each of the two sends happens exactly
/// once per call; retrying is the caller's job, on a fresh call.
pub async fn fetch_keys<C>(
    channel: &mut C,
    config: &ProximityExchangeConfig,
) -> Result<KeyResponse, ProximityExchangeError<C::Error>>
where
    C: ProximityChannel,
{
    log_msg!("sending handshake packet");
    channel
        .send_pdu(&packet::HANDSHAKE)
        .await
        .map_err(ProximityExchangeError::Channel)?;
    tokio::time::sleep(config.settle_interval).await;

    log_msg!("sending key request packet");
    channel
        .send_pdu(&packet::KEY_REQUEST)
        .await
        .map_err(ProximityExchangeError::Channel)?;

    // one deadline for the whole receive phase
    let deadline = Instant::now() + config.response_timeout;
    loop {
        let frame = match tokio::time::timeout_at(deadline, channel.recv_pdu()).await {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => return Err(ProximityExchangeError::Channel(e)),
            Err(_) => return Err(ProximityExchangeError::ResponseTimeout),
        };
        log_msg!("received frame ({} bytes): {}", frame.len(), hex::encode(&frame));

        match KeyResponse::decode(&frame) {
            Some(rsp) if !rsp.is_empty() => return Ok(rsp),
            // housekeeping frame, or a key response with nothing in it yet
            Some(_) | None => {}
        }
    }
}
