/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

pub mod packet;

mod response;
pub use response::{KeyKind, KeyRecord, KeyResponse};
