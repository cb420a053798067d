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

use crate::events::properties::{present_string, Properties};

/// A field a product can be identified by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    /// `productId` or `product_id`, in any spelling
    ProductId,
    /// `productId` or `product_id`, spelled exactly so
    ExactProductId,
    /// The generic `id`
    Id,
    Sku,
}

impl IdentityField {
    fn key(&self) -> &'static str {
        match self {
            IdentityField::ProductId | IdentityField::ExactProductId => "product_id",
            IdentityField::Id => "id",
            IdentityField::Sku => "sku",
        }
    }
}

/// Identity fallback for single products and order lines: product id, then id, then SKU
pub const PRODUCT_IDENTITY: &[IdentityField] = &[IdentityField::ProductId, IdentityField::Id, IdentityField::Sku];

/// Identity fallback for product lists: exactly spelled product id only
///
/// Products in a list without a product id are left out even when they
/// have an `id` or a SKU, unlike with PRODUCT_IDENTITY.
pub const LIST_IDENTITY: &[IdentityField] = &[IdentityField::ExactProductId];

/// Returns the first present identity among the permitted fields, in order
pub fn resolve_identity(product: &Properties, fields: &[IdentityField]) -> Option<String> {
    fields.iter().find_map(|field| match field {
        IdentityField::ExactProductId => ["productId", "product_id"].iter()
            .find_map(|key| product.get_exact(key).and_then(present_string)),
        _ => product.get_string(field.key()),
    })
}

/// Resolves the identity of every product, keeping those which have one, in order
pub fn collect_identities(products: &[Properties], fields: &[IdentityField]) -> Vec<String> {
    products.iter()
        .filter_map(|product| resolve_identity(product, fields))
        .collect()
}
