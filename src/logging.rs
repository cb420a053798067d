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

use crate::config;

use flexi_logger::{DeferredNow, FlexiLoggerError, LogSpecification, Logger, LoggerHandle};

/// Starts logging to standard error: standard output belongs to the pixel calls
pub fn init_logger(log_config: &config::Logging) -> Result<LoggerHandle, FlexiLoggerError> {
    let mut spec = LogSpecification::builder();
    spec.module("snaptr", log_config.level);

    Logger::with(spec.build())
        .log_to_stderr()
        .format(record_formatter)
        .start()
}

/// `<time> <level> [<module>] [<event>] <message>`, the event part only if the record has one
pub fn record_formatter(
    writer: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record) -> Result<(), std::io::Error> {
    writeln!(
        writer,
        "{} {} [{}]{} {}",
        now.format_rfc3339(),
        record.level(),
        record.module_path().unwrap_or("snaptr::<unknown>"),
        record.key_values().get("event".into()).map(|e| format!(" [{}]", e)).unwrap_or("".into()),
        record.args(),
    )
}
