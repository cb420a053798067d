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

//! E-commerce track events with a standard pixel counterpart
//!
//! Each event reads its properties into a typed record first, absent
//! fields staying absent, then renders the pixel payload from that record.

use crate::events::properties::{Properties, present_string};
use crate::pixel::identity::{collect_identities, resolve_identity, LIST_IDENTITY, PRODUCT_IDENTITY};
use crate::pixel::revenue::{format_order_revenue, format_revenue};
use crate::pixel::{StandardEvent, VendorCall};

use serde_json::{Map, Value};

/// The recognised e-commerce events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcommerceEvent {
    ProductListViewed,
    ProductViewed,
    ProductAdded,
    OrderCompleted,
}

impl EcommerceEvent {
    /// Recognises an event name, current or legacy (v1) spelling
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Product List Viewed" => Some(EcommerceEvent::ProductListViewed),
            "Product Viewed" | "Viewed Product" => Some(EcommerceEvent::ProductViewed),
            "Product Added" | "Added Product" => Some(EcommerceEvent::ProductAdded),
            "Order Completed" | "Completed Order" => Some(EcommerceEvent::OrderCompleted),
            _ => None,
        }
    }

    /// Builds the pixel call for this event
    pub fn to_call(&self, properties: &Properties) -> VendorCall {
        match self {
            EcommerceEvent::ProductListViewed => ProductList::read(properties).into_call(),
            EcommerceEvent::ProductViewed => ProductDetails::read(properties).into_call(StandardEvent::ViewContent),
            EcommerceEvent::ProductAdded => ProductDetails::read(properties).into_call(StandardEvent::AddToCart),
            EcommerceEvent::OrderCompleted => Order::read(properties).into_call(),
        }
    }
}

/// Product List Viewed
#[derive(Debug, Clone, PartialEq)]
pub struct ProductList {
    pub item_ids: Vec<String>,
}

impl ProductList {
    pub fn read(properties: &Properties) -> Self {
        let products = properties.get_objects("products").unwrap_or_default();
        Self {
            item_ids: collect_identities(&products, LIST_IDENTITY),
        }
    }

    pub fn into_call(self) -> VendorCall {
        let mut payload = Map::new();
        payload.insert("item_ids".into(), string_list(self.item_ids));
        VendorCall::Track { event: StandardEvent::ViewContent, properties: payload }
    }
}

/// Product Viewed and Product Added
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub identity: Option<String>,
    pub category: Option<String>,
    pub currency: Option<Value>,
    pub price: Option<Value>,
}

impl ProductDetails {
    pub fn read(properties: &Properties) -> Self {
        Self {
            identity: resolve_identity(properties, PRODUCT_IDENTITY),
            category: properties.get_string("category"),
            currency: present_value(properties, "currency"),
            price: present_value(properties, "price"),
        }
    }

    pub fn into_call(self, event: StandardEvent) -> VendorCall {
        let mut payload = Map::new();
        payload.insert("item_ids".into(), string_list(vec!(self.identity.unwrap_or_default())));
        payload.insert("item_category".into(), Value::String(self.category.unwrap_or_default()));
        if let Some(currency) = self.currency {
            payload.insert("currency".into(), currency);
        }
        payload.insert("price".into(), Value::String(format_revenue(self.price.as_ref())));
        VendorCall::Track { event, properties: payload }
    }
}

/// Order Completed
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: Option<String>,
    pub currency: Option<Value>,
    pub item_ids: Vec<String>,
    pub revenue: Option<Value>,
}

impl Order {
    pub fn read(properties: &Properties) -> Self {
        let products = properties.get_objects("products").unwrap_or_default();
        Self {
            order_id: properties.get("order_id")
                .and_then(present_string)
                .or_else(|| properties.get_string("id")),
            currency: present_value(properties, "currency"),
            item_ids: collect_identities(&products, PRODUCT_IDENTITY),
            /* the total stands in for a missing or zero revenue on completed orders */
            revenue: truthy_value(properties, "revenue")
                .or_else(|| truthy_value(properties, "total")),
        }
    }

    pub fn into_call(self) -> VendorCall {
        let mut payload = Map::new();
        payload.insert("transaction_id".into(), Value::String(self.order_id.unwrap_or_default()));
        if let Some(currency) = self.currency {
            payload.insert("currency".into(), currency);
        }
        payload.insert("item_ids".into(), string_list(self.item_ids));
        payload.insert("price".into(), Value::String(format_order_revenue(self.revenue.as_ref())));
        VendorCall::Track { event: StandardEvent::Purchase, properties: payload }
    }
}

/// A property, unless it is null
fn present_value(properties: &Properties, key: &str) -> Option<Value> {
    properties.get(key).filter(|v| !v.is_null()).cloned()
}

/// A property, unless it is null, false, zero or an empty string
fn truthy_value(properties: &Properties, key: &str) -> Option<Value> {
    properties.get(key).filter(|v| present_string(v).is_some()).cloned()
}

fn string_list(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}
