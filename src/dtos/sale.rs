use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_id: Option<i64>, // None = guest sale
    pub payment_method: String,
    pub items: Vec<SaleItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct SaleItemRequest {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Option<f64>, // Optional - uses catalog price if not provided
}

#[derive(Serialize)]
pub struct SaleResponse {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub sale_date: DateTime<Utc>,
    pub total_amount: f64,
    pub payment_method: String,
    pub items: Vec<SaleItemResponse>,
}

#[derive(Serialize)]
pub struct SaleItemResponse {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Serialize)]
pub struct SaleListItem {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub sale_date: DateTime<Utc>,
    pub total_amount: f64,
    pub payment_method: String,
    pub total_items: i64,
}

/// Joins first/last name the way the sales history page displayed them.
pub fn display_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
        (Some(f), None) => Some(f.to_string()),
        (None, Some(l)) => Some(l.to_string()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(
            display_name(Some("John"), Some("Doe")),
            Some("John Doe".to_string())
        );
        assert_eq!(display_name(Some("John"), None), Some("John".to_string()));
        assert_eq!(display_name(None, None), None);
    }

    #[test]
    fn test_create_sale_request_optional_fields() {
        // Guest sale with a price override on one line.
        let req: CreateSaleRequest = serde_json::from_str(
            r#"{
                "payment_method": "Cash",
                "items": [
                    {"product_id": 1, "quantity": 3},
                    {"product_id": 2, "quantity": 1, "unit_price": 1.50}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(req.customer_id, None);
        assert_eq!(req.items.len(), 2);
        assert_eq!(req.items[0].unit_price, None);
        assert_eq!(req.items[1].unit_price, Some(1.50));
    }
}
