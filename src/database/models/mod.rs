pub mod food;

use serde::Serialize;
use serde_json::Value;

use super::Document;

pub use food::{FoodEdit, StockUpdate};

/// Owner identity on foods (creator) and orders (purchaser).
pub const OWNER_FIELD: &str = "email";

/// Serialize a typed update body into a `$set` document. Fields absent from
/// the request are written as `null`.
pub fn to_set_document<T: Serialize>(value: &T) -> Document {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Document::new(),
    }
}
