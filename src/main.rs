/* snaptr - translates Rudderstack/Segment events into Snap Pixel commands
 * Copyright (C) 2023 Withings
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>. */

use snaptr::config;
use snaptr::forwarder::Forwarder;
use snaptr::logging::init_logger;
use snaptr::replay::{open_input, replay};
use snaptr::sinks::init_sinks;

use clap::Parser;
use log;
use std::path::PathBuf;

/// Replays Rudderstack/Segment events as Snap Pixel calls
#[derive(Parser)]
#[command(name = "snaptr", version, about)]
struct Arguments {
    /// Configuration file (defaults to $SNAPTR_CONFIG, then the usual locations)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Event dump, one event or batch per line; standard input if absent or `-`
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
}

/// snaptr's entry point: welcome!
fn main() {
    let arguments = Arguments::parse();

    /* Locate and parse the configuration file, see config.rs */
    let configuration = match config::get_configuration(arguments.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to process configuration file: {}", e);
            std::process::exit(1);
        }
    };

    let _logger = match init_logger(&configuration.logging) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("failed to start logger: {}", e);
            std::process::exit(1);
        }
    };

    /* Instantiate all sinks as per the configuration */
    let sinks = match init_sinks(&configuration.sinks) {
        Ok(s) => s,
        Err(e) => {
            log::error!("sink error: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("forwarding to pixel {} through {}", configuration.pixel.pixel_id, sinks);

    let input = match open_input(arguments.input.as_deref()) {
        Ok(i) => i,
        Err(e) => {
            log::error!("failed to open input: {}", e);
            std::process::exit(1);
        }
    };

    let mut forwarder = Forwarder::new(configuration.pixel.pixel_id, sinks);
    match replay(input, &mut forwarder) {
        Ok(summary) => log::info!(
            "done: {} payload(s) accepted, {} rejected, {} with sink errors",
            summary.accepted, summary.rejected, summary.failed
        ),
        Err(e) => log::error!("failed to read input, stopping: {}", e),
    }

    match serde_json::to_string(forwarder.stats()) {
        Ok(stats) => log::info!("statistics: {}", stats),
        Err(e) => log::warn!("failed to serialise statistics: {}", e),
    }
}
