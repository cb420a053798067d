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

use snaptr::events::any::EventOrBatch;
use snaptr::events::rejections::explain_rejection;
use snaptr::pixel;

/// Helper program to troubleshoot events: pass a payload on stdin, get an
/// explanation of why it is rejected, or the pixel calls it maps to
pub fn main() {
    let input = match std::io::read_to_string(std::io::stdin()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read stdin: {}", e);
            std::process::exit(1);
        }
    };

    let explanations = explain_rejection(&input);
    if !explanations.is_empty() {
        println!("{}", explanations.join("\n"));
        std::process::exit(1);
    }

    println!("No errors.");
    /* explain_rejection() found nothing, so this parses */
    if let Ok(payload) = serde_json::from_str::<EventOrBatch>(&input) {
        for event in payload.into_events() {
            match pixel::dispatch(&event) {
                Some(call) => println!("{} -> {}", event.kind(), call.arguments()),
                None => println!("{} -> no pixel call", event.kind()),
            }
        }
    }
}
