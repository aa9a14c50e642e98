/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

use log::Level;

pub const PROXIMITY_DEBUG_LOG_LEVEL: Level = Level::Debug;
pub const PROXIMITY_DEBUG_LOG_TARGET: &str = "";

#[macro_export]
macro_rules! log_msg {
    ($s:literal) => (
        log::log!(target: $crate::PROXIMITY_DEBUG_LOG_TARGET, $crate::PROXIMITY_DEBUG_LOG_LEVEL, concat!(": ", $s))
    );
    ($s:literal, $($arg:tt)+) => (
        log::log!(target: $crate::PROXIMITY_DEBUG_LOG_TARGET, $crate::PROXIMITY_DEBUG_LOG_LEVEL, concat!(": ", $s), $($arg)+)
    );
}
