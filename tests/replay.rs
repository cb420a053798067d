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

use snaptr::config::parse_configuration;
use snaptr::forwarder::Forwarder;
use snaptr::replay::replay;
use snaptr::sinks::jsonl::JsonLines;

use indoc::indoc;
use serde_json::{json, Value};

const SESSION: &str = indoc! {r#"
    {"type": "identify", "anonymousId": "anon-1", "userId": "123", "traits": {"e_mail": "gottaketchumall@poke.mon"}}
    {"type": "page", "anonymousId": "anon-1", "name": "Home"}
    {"type": "track", "anonymousId": "anon-1", "event": "event", "properties": {"currency": "XXX", "revenue": 13, "property": true}}
    {"type": "track", "anonymousId": "anon-1", "event": "Product List Viewed", "properties": {"category": "Games", "products": [{"product_id": "507f1f77bcf86cd799439011", "sku": "45790-32"}, {"product_id": "505bd76785ebb509fc183733", "sku": "46493-32"}]}}
    {"type": "track", "anonymousId": "anon-1", "event": "Product Viewed", "properties": {"product_id": "507f1f77bcf86cd799439011", "currency": "USD", "quantity": 1, "price": 44.33, "name": "my product", "category": "cat 1", "sku": "p-298"}}
    {"type": "track", "anonymousId": "anon-1", "event": "Product Added", "properties": {"product_id": "507f1f77bcf86cd799439011", "currency": "USD", "quantity": 1, "name": "my product", "category": "cat 1", "sku": "p-298", "price": 24.75}}
    {"batch": [{"type": "track", "anonymousId": "anon-1", "event": "Order Completed", "properties": {"products": [{"product_id": "507f1f77bcf86cd799439011"}, {"product_id": "505bd76785ebb509fc183733"}], "currency": "USD", "total": 0.50, "orderId": 123}}]}
"#};

fn replay_session(dump: &str) -> Vec<Value> {
    let configuration = parse_configuration("pixel: {pixel_id: 123123123}").unwrap();
    let sink = JsonLines::new(Vec::<u8>::new(), "memory");
    let mut forwarder = Forwarder::new(configuration.pixel.pixel_id, sink);

    let summary = replay(dump.as_bytes(), &mut forwarder).unwrap();
    assert_eq!(summary.rejected, 0);

    let output = String::from_utf8(forwarder.into_sink().into_inner()).unwrap();
    output.lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn full_session() {
    assert_eq!(replay_session(SESSION), vec!(
        json!(["init", "123123123", {"user_email": "gottaketchumall@poke.mon"}]),
        json!(["track", "PAGE_VIEW", {}]),
        json!(["trackCustom", "event", {"currency": "XXX", "price": "13.00", "property": true}]),
        json!(["track", "VIEW_CONTENT", {"item_ids": ["507f1f77bcf86cd799439011", "505bd76785ebb509fc183733"]}]),
        json!(["track", "VIEW_CONTENT", {
            "item_ids": ["507f1f77bcf86cd799439011"],
            "item_category": "cat 1",
            "currency": "USD",
            "price": "44.33"
        }]),
        json!(["track", "ADD_TO_CART", {
            "item_ids": ["507f1f77bcf86cd799439011"],
            "item_category": "cat 1",
            "currency": "USD",
            "price": "24.75"
        }]),
        json!(["track", "PURCHASE", {
            "item_ids": ["507f1f77bcf86cd799439011", "505bd76785ebb509fc183733"],
            "currency": "USD",
            "price": "0.50",
            "transaction_id": "123"
        }]),
    ));
}

#[test]
fn anonymous_session_inits_without_email() {
    let calls = replay_session(indoc! {r#"
        {"type": "track", "event": "event", "properties": {"property": true}}
    "#});
    assert_eq!(calls, vec!(
        json!(["init", "123123123"]),
        json!(["trackCustom", "event", {"property": true}]),
    ));
}

#[test]
fn custom_events_keep_key_order() {
    let output = {
        let sink = JsonLines::new(Vec::<u8>::new(), "memory");
        let mut forwarder = Forwarder::new("1", sink);
        replay(r#"{"type": "track", "event": "e", "properties": {"zeta": 1, "value": 2, "alpha": 3}}"#.as_bytes(), &mut forwarder).unwrap();
        String::from_utf8(forwarder.into_sink().into_inner()).unwrap()
    };
    assert_eq!(output.lines().last().unwrap(), r#"["trackCustom","e",{"zeta":1,"price":"2.00","alpha":3}]"#);
}
