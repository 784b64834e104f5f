use crate::domain::model::{RawObject, Record, ResourceKind};
use serde_json::Value;
use std::collections::HashMap;

/// How one flat column is derived from the raw record.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    /// Copy a top-level field as-is.
    Scalar(&'static str),
    /// Project `parent.field`; null when the parent is missing or null.
    Nested(&'static str, &'static str),
    /// Serialize a shapeless top-level field to its JSON text; null when absent.
    Stringify(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub column: &'static str,
    pub rule: FieldRule,
}

const fn scalar(column: &'static str) -> FieldSpec {
    FieldSpec {
        column,
        rule: FieldRule::Scalar(column),
    }
}

const fn nested(column: &'static str, parent: &'static str, field: &'static str) -> FieldSpec {
    FieldSpec {
        column,
        rule: FieldRule::Nested(parent, field),
    }
}

const fn stringify(column: &'static str) -> FieldSpec {
    FieldSpec {
        column,
        rule: FieldRule::Stringify(column),
    }
}

const ORDER_FIELDS: &[FieldSpec] = &[
    scalar("id"),
    scalar("order_number"),
    scalar("name"),
    scalar("email"),
    scalar("phone"),
    scalar("created_at"),
    scalar("updated_at"),
    scalar("processed_at"),
    scalar("cancelled_at"),
    scalar("cancel_reason"),
    scalar("currency"),
    scalar("financial_status"),
    scalar("fulfillment_status"),
    scalar("total_price"),
    scalar("subtotal_price"),
    scalar("total_tax"),
    scalar("total_discounts"),
    scalar("total_weight"),
    scalar("total_tip_received"),
    nested("customer_id", "customer", "id"),
    nested("customer_email", "customer", "email"),
    nested("billing_address_name", "billing_address", "name"),
    nested("billing_address_company", "billing_address", "company"),
    nested("billing_address_address1", "billing_address", "address1"),
    nested("billing_address_city", "billing_address", "city"),
    nested("billing_address_province", "billing_address", "province"),
    nested("billing_address_country", "billing_address", "country"),
    nested("billing_address_zip", "billing_address", "zip"),
    nested("shipping_address_name", "shipping_address", "name"),
    nested("shipping_address_company", "shipping_address", "company"),
    nested("shipping_address_address1", "shipping_address", "address1"),
    nested("shipping_address_city", "shipping_address", "city"),
    nested("shipping_address_province", "shipping_address", "province"),
    nested("shipping_address_country", "shipping_address", "country"),
    nested("shipping_address_zip", "shipping_address", "zip"),
    scalar("note"),
    scalar("tags"),
];

const PRODUCT_FIELDS: &[FieldSpec] = &[
    scalar("id"),
    scalar("title"),
    scalar("body_html"),
    scalar("vendor"),
    scalar("product_type"),
    scalar("created_at"),
    scalar("updated_at"),
    scalar("published_at"),
    scalar("template_suffix"),
    scalar("status"),
    scalar("published_scope"),
    scalar("tags"),
    scalar("admin_graphql_api_id"),
    scalar("handle"),
];

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    scalar("id"),
    scalar("email"),
    scalar("accepts_marketing"),
    scalar("created_at"),
    scalar("updated_at"),
    scalar("first_name"),
    scalar("last_name"),
    scalar("orders_count"),
    scalar("state"),
    scalar("total_spent"),
    scalar("last_order_id"),
    scalar("note"),
    scalar("verified_email"),
    scalar("multipass_identifier"),
    scalar("tax_exempt"),
    scalar("tags"),
    scalar("last_order_name"),
    scalar("currency"),
    scalar("phone"),
    stringify("addresses"),
    scalar("accepts_marketing_updated_at"),
    scalar("marketing_opt_in_level"),
    stringify("tax_exemptions"),
    scalar("admin_graphql_api_id"),
    stringify("default_address"),
];

pub const EXTRACTED_AT: &str = "extracted_at";

pub fn field_specs(kind: ResourceKind) -> &'static [FieldSpec] {
    match kind {
        ResourceKind::Orders => ORDER_FIELDS,
        ResourceKind::Products => PRODUCT_FIELDS,
        ResourceKind::Customers => CUSTOMER_FIELDS,
    }
}

/// Flat column names for a resource kind, in declaration order, `extracted_at`
/// last. This is also the destination table's column order.
pub fn columns(kind: ResourceKind) -> Vec<&'static str> {
    field_specs(kind)
        .iter()
        .map(|spec| spec.column)
        .chain(std::iter::once(EXTRACTED_AT))
        .collect()
}

/// Maps one raw record into one flat record. The output key set is fixed per
/// resource kind; fields missing from the input become null. Pure apart from
/// reading the wall clock for the `extracted_at` stamp.
pub fn flatten(kind: ResourceKind, raw: &RawObject) -> Record {
    let mut data = HashMap::new();

    for spec in field_specs(kind) {
        let value = match spec.rule {
            FieldRule::Scalar(field) => raw.get(field).cloned().unwrap_or(Value::Null),
            FieldRule::Nested(parent, field) => raw
                .get(parent)
                .filter(|v| !v.is_null())
                .and_then(|v| v.get(field))
                .cloned()
                .unwrap_or(Value::Null),
            FieldRule::Stringify(field) => match raw.get(field) {
                Some(v) if !v.is_null() => Value::String(v.to_string()),
                _ => Value::Null,
            },
        };
        data.insert(spec.column.to_string(), value);
    }

    data.insert(
        EXTRACTED_AT.to_string(),
        Value::String(chrono::Utc::now().to_rfc3339()),
    );

    Record { data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn raw(value: serde_json::Value) -> RawObject {
        value.as_object().unwrap().clone()
    }

    fn key_set(record: &Record) -> HashSet<&str> {
        record.data.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_key_set_is_fixed_regardless_of_input() {
        let full = raw(serde_json::json!({
            "id": 1001,
            "order_number": 42,
            "customer": { "id": 7, "email": "a@b.c" },
            "billing_address": { "city": "Berlin", "zip": "10115" }
        }));
        let empty = raw(serde_json::json!({}));

        let flat_full = flatten(ResourceKind::Orders, &full);
        let flat_empty = flatten(ResourceKind::Orders, &empty);

        let expected: HashSet<&str> = columns(ResourceKind::Orders).into_iter().collect();
        assert_eq!(key_set(&flat_full), expected);
        assert_eq!(key_set(&flat_empty), expected);
        assert_eq!(flat_full.data.len(), ORDER_FIELDS.len() + 1);
    }

    #[test]
    fn test_nested_projection_and_missing_parent() {
        let with_customer = raw(serde_json::json!({
            "id": 1,
            "customer": { "id": 7, "email": "a@b.c" }
        }));
        let without_customer = raw(serde_json::json!({ "id": 2, "customer": null }));

        let flat = flatten(ResourceKind::Orders, &with_customer);
        assert_eq!(flat.data["customer_id"], serde_json::json!(7));
        assert_eq!(flat.data["customer_email"], serde_json::json!("a@b.c"));

        let flat = flatten(ResourceKind::Orders, &without_customer);
        assert_eq!(flat.data["customer_id"], serde_json::Value::Null);
        assert_eq!(flat.data["customer_email"], serde_json::Value::Null);
        assert_eq!(flat.data["billing_address_city"], serde_json::Value::Null);
    }

    #[test]
    fn test_shapeless_collections_are_stringified() {
        let customer = raw(serde_json::json!({
            "id": 5,
            "addresses": [{ "city": "Oslo" }],
            "default_address": { "city": "Oslo" }
        }));

        let flat = flatten(ResourceKind::Customers, &customer);
        assert_eq!(
            flat.data["addresses"],
            serde_json::json!("[{\"city\":\"Oslo\"}]")
        );
        assert_eq!(
            flat.data["default_address"],
            serde_json::json!("{\"city\":\"Oslo\"}")
        );
        // Absent collections stay null rather than failing.
        assert_eq!(flat.data["tax_exemptions"], serde_json::Value::Null);
    }

    #[test]
    fn test_flattening_is_idempotent_except_timestamp() {
        let product = raw(serde_json::json!({
            "id": 9,
            "title": "Mug",
            "vendor": "Acme",
            "variants": [{ "price": "9.99" }]
        }));

        let a = flatten(ResourceKind::Products, &product);
        let b = flatten(ResourceKind::Products, &product);

        for column in columns(ResourceKind::Products) {
            if column == EXTRACTED_AT {
                continue;
            }
            assert_eq!(a.data[column], b.data[column], "column {}", column);
        }
    }

    #[test]
    fn test_extracted_at_is_wall_clock_not_api_time() {
        let product = raw(serde_json::json!({ "id": 9, "created_at": "2019-01-01T00:00:00Z" }));
        let flat = flatten(ResourceKind::Products, &product);

        let stamp = flat.data[EXTRACTED_AT].as_str().unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(stamp).unwrap();
        assert!(chrono::Utc::now().signed_duration_since(parsed).num_seconds() < 60);
    }

    #[test]
    fn test_product_and_customer_column_counts() {
        assert_eq!(columns(ResourceKind::Products).len(), 15);
        assert_eq!(columns(ResourceKind::Customers).len(), 26);
        assert_eq!(columns(ResourceKind::Orders).len(), 38);
    }
}
