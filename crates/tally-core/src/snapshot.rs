//! Reading sales and product snapshots from JSON files
//!
//! A file may hold a bare array of records or an object with the records
//! under `sales` / `products` (the shape of a store export or an analytics
//! request body).

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{ProductRecord, SaleRecord};

/// Read sale records from a JSON file
pub fn read_sales(path: &Path) -> Result<Vec<SaleRecord>> {
    let sales: Vec<SaleRecord> = read_collection(path, "sales")?;
    tracing::debug!(path = %path.display(), count = sales.len(), "Loaded sales");
    Ok(sales)
}

/// Read product records from a JSON file
pub fn read_products(path: &Path) -> Result<Vec<ProductRecord>> {
    let products: Vec<ProductRecord> = read_collection(path, "products")?;
    tracing::debug!(path = %path.display(), count = products.len(), "Loaded products");
    Ok(products)
}

fn read_collection<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)?;
    parse_collection(&content, key)
        .map_err(|e| Error::InvalidData(format!("{}: {}", path.display(), e)))
}

/// Parse a bare array, or the array stored under `key` in an object
pub fn parse_collection<T: DeserializeOwned>(content: &str, key: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(content)?;

    let items = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| Error::InvalidData(format!("expected a \"{}\" array", key)))?,
        _ => {
            return Err(Error::InvalidData(format!(
                "expected an array or an object with \"{}\"",
                key
            )))
        }
    };

    Ok(serde_json::from_value(items)?)
}
