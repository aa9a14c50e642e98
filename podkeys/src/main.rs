/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

use std::io;
use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

use podkeys_client::ProximityExchangeConfig;
use podkeys_client::proto::packet::PROXIMITY_PSM;

mod connection;
mod logger;

#[cfg(not(target_os = "linux"))]
compile_error!("podkeys drives the Linux bluetooth socket stack and only builds on Linux");

const GLOBAL_ARG_COMPLETION: &str = "completion";
const GLOBAL_ARG_PEER: &str = "peer";
const GLOBAL_ARG_PSM: &str = "psm";
const GLOBAL_ARG_TIMEOUT: &str = "timeout";
const GLOBAL_ARG_SETTLE: &str = "settle";
const GLOBAL_ARG_VERBOSE: &str = "verbose";

fn build_cli_args() -> Command {
    Command::new("podkeys")
        .arg(
            Arg::new(GLOBAL_ARG_COMPLETION)
                .num_args(1)
                .value_name("SHELL")
                .long("completion")
                .value_parser(value_parser!(Shell))
                .exclusive(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_PEER)
                .help("Peer bluetooth device address")
                .num_args(1)
                .value_name("BDADDR")
                .required_unless_present(GLOBAL_ARG_COMPLETION),
        )
        .arg(
            Arg::new(GLOBAL_ARG_PSM)
                .help("L2CAP PSM of the proximity key service")
                .num_args(1)
                .value_name("PSM")
                .long("psm")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new(GLOBAL_ARG_TIMEOUT)
                .help("Response wait budget, in seconds")
                .num_args(1)
                .value_name("SECONDS")
                .long("timeout")
                .short('t')
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new(GLOBAL_ARG_SETTLE)
                .help("Delay between handshake and key request, in milliseconds")
                .num_args(1)
                .value_name("MILLISECONDS")
                .long("settle")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new(GLOBAL_ARG_VERBOSE)
                .help("show verbose message")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .global(true),
        )
}

fn hexdump(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<String>>()
        .join(" ")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = build_cli_args().get_matches();

    if let Some(target) = args.get_one::<Shell>(GLOBAL_ARG_COMPLETION) {
        let mut app = build_cli_args();
        let bin_name = app.get_name().to_string();
        clap_complete::generate(*target, &mut app, bin_name, &mut io::stdout());
        return Ok(());
    }

    let verbose_level = args
        .get_one::<u8>(GLOBAL_ARG_VERBOSE)
        .copied()
        .unwrap_or_default();
    let logger = logger::SyncLogger::new(verbose_level);
    logger
        .into_global_logger()
        .map_err(|e| anyhow!("failed to install logger: {e}"))?;

    let peer = args.get_one::<String>(GLOBAL_ARG_PEER).unwrap();
    let peer = connection::BdAddr::from_str(peer)?;
    let psm = args
        .get_one::<u16>(GLOBAL_ARG_PSM)
        .copied()
        .unwrap_or(PROXIMITY_PSM);

    let mut config = ProximityExchangeConfig::default();
    if let Some(secs) = args.get_one::<u64>(GLOBAL_ARG_TIMEOUT) {
        config.response_timeout = Duration::from_secs(*secs);
    }
    if let Some(ms) = args.get_one::<u64>(GLOBAL_ARG_SETTLE) {
        config.settle_interval = Duration::from_millis(*ms);
    }

    log::info!("connecting to {peer} (L2CAP PSM 0x{psm:04X})...");
    let mut channel = connection::L2capChannel::connect(peer, psm).await?;
    log::info!("connected, starting key exchange");

    let keys = podkeys_client::fetch_keys(&mut channel, &config).await?;

    log::info!("keys successfully retrieved");
    println!("Proximity Keys:");
    for record in keys.records() {
        println!("  {}: {}", record.kind(), hexdump(record.material()));
    }
    Ok(())
}
