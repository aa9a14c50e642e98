/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

mod debug;
pub use debug::{PROXIMITY_DEBUG_LOG_LEVEL, PROXIMITY_DEBUG_LOG_TARGET};

pub mod proto;

mod channel;
pub use channel::ProximityChannel;

mod config;
pub use config::ProximityExchangeConfig;

mod exchange;
pub use exchange::{ProximityExchangeError, fetch_keys};
