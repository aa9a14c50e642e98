/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

use std::time::Duration;

const DEFAULT_SETTLE_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timing knobs for one key exchange run.
#[derive(Clone, Copy, Debug)]
pub struct ProximityExchangeConfig {
    /// Quiescence delay between the handshake and the key request, to let
    /// the peer process the handshake before the next write. The right
    /// value is peer-dependent.
    pub settle_interval: Duration,
    /// Cumulative wait budget for the whole receive phase. Frames that do
    /// not carry keys consume it without refilling it.
    pub response_timeout: Duration,
}

impl Default for ProximityExchangeConfig {
    fn default() -> Self {
        ProximityExchangeConfig {
            settle_interval: DEFAULT_SETTLE_INTERVAL,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}
