//! # Wire Format
//!
//! JSON shapes exchanged with the backend, and their conversion to the
//! domain types in `stockroom-core`.
//!
//! ## Envelope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every response body:                                                   │
//! │                                                                         │
//! │    { "success": true,  "message": "Item added", "data": { ... } }      │
//! │    { "success": false, "message": "Item not found" }                    │
//! │                                                                         │
//! │  The item and product lists nest one level deeper:                      │
//! │    { "success": true, "data": { "data": [ ... ] } }                     │
//! │  Orders arrive flat under "data".                                       │
//! │                                                                         │
//! │  Records use Mongo-style "_id" keys and camelCase field names.          │
//! │  Prices arrive as JSON numbers (19.9) and are parsed digit by digit     │
//! │  into Money, never through f64 arithmetic.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use stockroom_core::{CatalogItem, ItemDraft, Money, Order, Product, ProductDraft};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

// =============================================================================
// Envelope
// =============================================================================

/// The `{success, message?, data?}` wrapper around every response.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Turns `success: false` into [`ClientError::Rejected`].
    pub fn into_result(self, operation: &str) -> ClientResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ClientError::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| format!("{operation} was rejected")),
            })
        }
    }

    /// Like [`into_result`](Self::into_result), but the payload is required.
    pub fn into_data(self, operation: &str) -> ClientResult<T> {
        self.into_result(operation)?
            .ok_or_else(|| ClientError::MissingData {
                operation: operation.to_string(),
            })
    }
}

/// The `{data: [...]}` payload of the list routes.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct WireList<T> {
    #[serde(default)]
    pub data: Vec<T>,
}

/// Outcome of a mutation the caller inspects itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Ack {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Ack {
            success: false,
            message: Some(message.into()),
        }
    }
}

// =============================================================================
// Number Helpers
// =============================================================================

/// Numbers sometimes arrive as strings when they were typed into a form.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

fn de_money<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => return Ok(Money::zero()),
        Some(NumberOrText::Number(n)) => n.to_string(),
        Some(NumberOrText::Text(s)) => s,
    };
    Money::parse_major(&text).map_err(de::Error::custom)
}

fn ser_money<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if money.minor_part() == 0 {
        serializer.serialize_i64(money.major())
    } else {
        serializer.serialize_f64(money.cents() as f64 / 100.0)
    }
}

fn de_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumberOrText::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| de::Error::custom(format!("expected a whole number, got {n}"))),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a whole number, got '{s}'"))),
    }
}

// =============================================================================
// Items
// =============================================================================

/// An inventory item as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireItem {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "de_count")]
    pub quantity: i64,

    #[serde(default, serialize_with = "ser_money", deserialize_with = "de_money")]
    pub price: Money,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<WireItem> for CatalogItem {
    fn from(wire: WireItem) -> Self {
        CatalogItem {
            id: wire.id,
            name: wire.name,
            quantity: wire.quantity,
            price: wire.price,
            description: wire.description.unwrap_or_default(),
            category: wire.category.unwrap_or_default(),
            image: wire.image,
        }
    }
}

impl From<&CatalogItem> for WireItem {
    fn from(item: &CatalogItem) -> Self {
        WireItem {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
            description: Some(item.description.clone()),
            category: Some(item.category.clone()),
            image: item.image.clone(),
        }
    }
}

/// Body of a stock commit: the whole item with its decremented quantity,
/// plus the billed quantity the backend records as an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStockCommit {
    #[serde(flatten)]
    pub item: WireItem,

    pub bill_quantity: i64,
}

/// Body of `add-item`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNewItem {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    #[serde(serialize_with = "ser_money")]
    pub price: Money,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub user_id: String,
}

impl WireNewItem {
    pub fn new(draft: &ItemDraft, user_id: &str) -> Self {
        WireNewItem {
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            quantity: draft.quantity,
            price: draft.price,
            category: draft.category.clone(),
            image: draft.image.clone(),
            user_id: user_id.to_string(),
        }
    }
}

/// `{ "_id": ... }` body of the delete routes.
#[derive(Debug, Clone, Serialize)]
pub struct WireId<'a> {
    #[serde(rename = "_id")]
    pub id: &'a str,
}

/// `{ "userId": ... }` body of the scoped reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScope<'a> {
    pub user_id: &'a str,
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct WireProduct {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Product {
            id: wire.id,
            name: wire.name,
            category: wire.category.unwrap_or_default(),
            image: wire.image,
        }
    }
}

/// Body of `add-product`.
#[derive(Debug, Clone, Serialize)]
pub struct WireNewProduct {
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&ProductDraft> for WireNewProduct {
    fn from(draft: &ProductDraft) -> Self {
        WireNewProduct {
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            image: draft.image.clone(),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "de_count")]
    pub bill_quantity: i64,

    #[serde(default, deserialize_with = "de_money")]
    pub price: Money,

    pub created_at: DateTime<Utc>,
}

impl From<WireOrder> for Order {
    fn from(wire: WireOrder) -> Self {
        Order {
            id: wire.id,
            name: wire.name,
            category: wire.category.unwrap_or_default(),
            bill_quantity: wire.bill_quantity,
            price: wire.price,
            created_at: wire.created_at,
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Body of `signup`: the address the OTP goes to.
#[derive(Debug, Clone, Serialize)]
pub struct WireSignup<'a> {
    pub email: &'a str,
}

/// Body of `verify` and `login`.
#[derive(Debug, Clone, Serialize)]
pub struct WireCredentials<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    #[serde(rename = "UserId", alias = "userId", alias = "_id")]
    pub user_id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, rename = "isAdmin")]
    pub is_admin: Option<bool>,
}

/// Response of `login` and `verify`. The user record sits next to the
/// envelope fields rather than under `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAuthResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub user: Option<WireUser>,

    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl WireAuthResponse {
    /// Builds the session for `email`, or explains why there is none.
    pub fn into_session(self, email: &str, operation: &str) -> ClientResult<Session> {
        if !self.success {
            return Err(ClientError::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| format!("{operation} was rejected")),
            });
        }

        let user = self.user.ok_or_else(|| ClientError::MissingData {
            operation: operation.to_string(),
        })?;

        let mut session = Session::new(user.user_id, user.email.unwrap_or_else(|| email.to_string()));
        session.name = user.name;
        session.is_admin = self.is_admin.or(user.is_admin).unwrap_or(false);
        Ok(session)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_from_backend_json() {
        let body = json!({
            "_id": "665f",
            "name": "Blue Pen",
            "quantity": 12,
            "price": 19.9,
            "description": null,
            "category": "Stationery",
            "userId": "u1"
        });

        let item: CatalogItem = serde_json::from_value::<WireItem>(body).unwrap().into();
        assert_eq!(item.id, "665f");
        assert_eq!(item.price, Money::from_cents(1990));
        assert_eq!(item.description, "");
        assert_eq!(item.category, "Stationery");
    }

    #[test]
    fn test_numbers_sent_as_text() {
        let body = json!({ "_id": "1", "name": "Tape", "quantity": "7", "price": "2.50" });
        let wire: WireItem = serde_json::from_value(body).unwrap();
        assert_eq!(wire.quantity, 7);
        assert_eq!(wire.price, Money::from_cents(250));

        let bad = json!({ "_id": "1", "name": "Tape", "quantity": 1.5, "price": 1 });
        assert!(serde_json::from_value::<WireItem>(bad).is_err());
    }

    #[test]
    fn test_stock_commit_body() {
        let item = CatalogItem::new("a1", "Notebook", 6, Money::from_cents(2050));
        let body = serde_json::to_value(WireStockCommit {
            item: WireItem::from(&item),
            bill_quantity: 4,
        })
        .unwrap();

        assert_eq!(body["_id"], "a1");
        assert_eq!(body["quantity"], 6);
        assert_eq!(body["price"], 20.5);
        assert_eq!(body["billQuantity"], 4);
    }

    #[test]
    fn test_whole_prices_serialize_as_integers() {
        let item = CatalogItem::new("a1", "Notebook", 6, Money::from_cents(4000));
        let body = serde_json::to_value(WireItem::from(&item)).unwrap();
        assert_eq!(body["price"], 40);
    }

    #[test]
    fn test_envelope_results() {
        let ok: Envelope<Vec<WireItem>> =
            serde_json::from_value(json!({ "success": true, "data": [] })).unwrap();
        assert!(ok.into_data("fetch").unwrap().is_empty());

        let missing: Envelope<Vec<WireItem>> =
            serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(matches!(
            missing.into_data("fetch"),
            Err(ClientError::MissingData { .. })
        ));

        let rejected: Envelope<Vec<WireItem>> =
            serde_json::from_value(json!({ "success": false, "message": "No items" })).unwrap();
        assert_eq!(
            rejected.into_result("fetch").unwrap_err().to_string(),
            "No items"
        );
    }

    #[test]
    fn test_item_list_is_nested() {
        let body = r#"{"success":true,"data":{"data":[{"_id":"a","name":"Blue Pen","quantity":3,"price":5}]}}"#;
        let envelope: Envelope<WireList<WireItem>> = serde_json::from_str(body).unwrap();
        let items = envelope.into_data("fetchAll-item").unwrap().data;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "a");

        let empty: Envelope<WireList<WireProduct>> =
            serde_json::from_value(json!({ "success": true, "data": {} })).unwrap();
        assert!(empty.into_data("fetchAll-products").unwrap().data.is_empty());
    }

    #[test]
    fn test_order_from_backend_json() {
        let body = json!({
            "_id": "o1",
            "name": "Blue Pen",
            "category": "Stationery",
            "billQuantity": 3,
            "price": 15,
            "createdAt": "2026-03-01T10:00:05.123Z"
        });
        let order: Order = serde_json::from_value::<WireOrder>(body).unwrap().into();
        assert_eq!(order.bill_quantity, 3);
        assert_eq!(order.line_total(), Money::from_cents(4500));
    }

    #[test]
    fn test_auth_response_into_session() {
        let body = json!({
            "success": true,
            "message": "Logged in",
            "user": { "UserId": "u42", "name": "Asha" },
            "isAdmin": true
        });
        let response: WireAuthResponse = serde_json::from_value(body).unwrap();
        let session = response.into_session("asha@shop.in", "login").unwrap();

        assert_eq!(session.user_id, "u42");
        assert_eq!(session.email, "asha@shop.in");
        assert_eq!(session.name.as_deref(), Some("Asha"));
        assert!(session.is_admin);

        let denied: WireAuthResponse =
            serde_json::from_value(json!({ "success": false, "message": "Wrong password" }))
                .unwrap();
        assert_eq!(
            denied.into_session("x@y.in", "login").unwrap_err().to_string(),
            "Wrong password"
        );
    }
}
