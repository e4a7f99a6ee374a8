use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME_FIELD: &str = "food_name";
pub const POPULARITY_FIELD: &str = "count";

/// `PATCH /foods/:id` body: stock level and popularity after a purchase.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StockUpdate {
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub count: Value,
}

/// `PATCH /updateFood/:id` body: every owner-editable field.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FoodEdit {
    #[serde(default)]
    pub food_name: Value,
    #[serde(default)]
    pub food_image: Value,
    #[serde(default)]
    pub food_category: Value,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub food_origin: Value,
    #[serde(default)]
    pub description: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::to_set_document;
    use serde_json::json;

    #[test]
    fn stock_update_sets_exactly_two_fields() {
        let update: StockUpdate = serde_json::from_value(json!({ "quantity": 5, "count": 1, "price": 9 })).unwrap();
        let set = to_set_document(&update);
        assert_eq!(Value::Object(set), json!({ "quantity": 5, "count": 1 }));
    }

    #[test]
    fn missing_edit_fields_are_written_as_null() {
        let edit: FoodEdit = serde_json::from_value(json!({ "food_name": "Ramen" })).unwrap();
        let set = to_set_document(&edit);
        assert_eq!(set.len(), 7);
        assert_eq!(set.get("food_name"), Some(&json!("Ramen")));
        assert_eq!(set.get("price"), Some(&Value::Null));
    }
}
