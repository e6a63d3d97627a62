//! Order submission types.
//!
//! [`OrderRequest`] is the JSON body of `POST /api/orders`:
//!
//! ```json
//! {
//!   "items": [{"product_id": 1, "title": "...", "price": 1000, "quantity": 2}],
//!   "customer": {"name": "", "phone": "", "city": "", "address": "", "notes": ""},
//!   "payment_method": "COD"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;

/// Delivery and contact details collected by the checkout form.
///
/// Every field is free text and may be empty; the backend decides what is
/// acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryInfo {
    pub name: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub notes: String,
}

impl DeliveryInfo {
    /// The text entered for `field`.
    #[must_use]
    pub fn value(&self, field: DeliveryField) -> &str {
        match field {
            DeliveryField::Name => &self.name,
            DeliveryField::Phone => &self.phone,
            DeliveryField::City => &self.city,
            DeliveryField::Address => &self.address,
            DeliveryField::Notes => &self.notes,
        }
    }
}

/// The fields of [`DeliveryInfo`] in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryField {
    Name,
    Phone,
    City,
    Address,
    Notes,
}

impl DeliveryField {
    /// All fields, in the order the checkout form shows them.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Phone,
        Self::City,
        Self::Address,
        Self::Notes,
    ];

    /// Form field name, matching the JSON key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::City => "city",
            Self::Address => "address",
            Self::Notes => "notes",
        }
    }

    /// Bilingual input placeholder.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "الاسم Name",
            Self::Phone => "الموبايل Phone",
            Self::City => "المدينة City",
            Self::Address => "العنوان Address",
            Self::Notes => "ملاحظات Notes",
        }
    }

    /// Whether the field is rendered as a multi-line text area.
    #[must_use]
    pub const fn is_multiline(self) -> bool {
        matches!(self, Self::Notes)
    }
}

/// Supported payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery, the only method the store accepts.
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
}

/// Body of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<CartLine>,
    pub customer: DeliveryInfo,
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Price, ProductId};

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            items: vec![CartLine {
                product_id: ProductId::new(1),
                title: "Zaatar".to_string(),
                price: Price::new(1000),
                quantity: 2,
            }],
            customer: DeliveryInfo {
                name: "Rami".to_string(),
                phone: "0999".to_string(),
                city: "Homs".to_string(),
                address: "Old souq".to_string(),
                notes: String::new(),
            },
            payment_method: PaymentMethod::CashOnDelivery,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["payment_method"], "COD");
        assert_eq!(value["items"][0]["product_id"], 1);
        assert_eq!(value["items"][0]["quantity"], 2);
        assert_eq!(value["items"][0]["price"], 1000);
        assert_eq!(value["customer"]["city"], "Homs");
        assert_eq!(value["customer"]["notes"], "");
    }

    #[test]
    fn test_delivery_info_missing_fields_default_to_empty() {
        let info: DeliveryInfo = serde_json::from_str(r#"{"name": "Lina"}"#).unwrap();
        assert_eq!(info.name, "Lina");
        assert!(info.phone.is_empty());
        assert!(info.notes.is_empty());
    }

    #[test]
    fn test_delivery_fields_cover_every_key() {
        let keys: Vec<_> = DeliveryField::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys, ["name", "phone", "city", "address", "notes"]);
        assert!(DeliveryField::Notes.is_multiline());
        assert!(!DeliveryField::Address.is_multiline());
    }

    #[test]
    fn test_delivery_info_value_by_field() {
        let info = DeliveryInfo {
            name: "Rami".to_string(),
            city: "Damascus".to_string(),
            notes: "Ring twice".to_string(),
            ..DeliveryInfo::default()
        };
        assert_eq!(info.value(DeliveryField::Name), "Rami");
        assert_eq!(info.value(DeliveryField::City), "Damascus");
        assert_eq!(info.value(DeliveryField::Notes), "Ring twice");
        assert_eq!(info.value(DeliveryField::Phone), "");
    }
}
