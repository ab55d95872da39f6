//! Domain models for Tally

use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Category assigned to products that don't carry one
pub const DEFAULT_CATEGORY: &str = "General";

/// Payment method assumed when a sale doesn't record one
pub const DEFAULT_PAYMENT_METHOD: &str = "cash";

/// A single sale line recorded at the cashier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub product_id: String,
    #[serde(default, alias = "nama")]
    pub product_name: String,
    #[serde(default, alias = "harga")]
    pub unit_price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Line total (unit price times quantity, after any discount)
    pub price: f64,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(deserialize_with = "flexible_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl SaleRecord {
    /// Create a single-unit sale; unit price equals the line total
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price: price,
            quantity: 1,
            price,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            timestamp,
        }
    }

    /// Set the quantity and derive the unit price from the line total
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self.unit_price = if quantity > 0 {
            self.price / quantity as f64
        } else {
            0.0
        };
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }
}

/// A product in the store catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(default = "default_category", alias = "kategori")]
    pub category: String,
    #[serde(default, alias = "harga")]
    pub unit_price: f64,
    #[serde(alias = "stok")]
    pub stock: u32,
    /// Units per restock batch, when the product is bought in bulk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
}

impl ProductRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            unit_price: 0.0,
            stock,
            batch_size: None,
        }
    }

    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

fn default_quantity() -> u32 {
    1
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

/// Accept document ids written either as strings or as plain numbers
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

/// Accept RFC 3339 strings, epoch milliseconds, or `{seconds, nanoseconds}`
/// objects as exported by document stores
fn flexible_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
        Parts {
            #[serde(alias = "_seconds")]
            seconds: i64,
            #[serde(default, alias = "_nanoseconds")]
            nanoseconds: u32,
        },
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", s, e))),
        RawTimestamp::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", ms))),
        RawTimestamp::Parts {
            seconds,
            nanoseconds,
        } => Utc
            .timestamp_opt(seconds, nanoseconds)
            .single()
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}s", seconds))),
    }
}
