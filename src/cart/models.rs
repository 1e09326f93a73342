//! Cart data models

use crate::error::FetchError;
use crate::network::StorefrontResponse;
use serde::{Deserialize, Serialize};

/// A product-add form as submitted: a stable id plus its fields in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub id: String,
    pub fields: Vec<(String, String)>,
}

impl ProductForm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

/// The line a product form asks the cart to add
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineRequest {
    pub variant_id: u64,
    pub quantity: u32,
    /// `properties[Name]` fields, name unwrapped
    pub properties: Vec<(String, String)>,
    fields: Vec<(String, String)>,
}

impl CartLineRequest {
    /// Validate a form's fields. `id` is required, `quantity` defaults to 1,
    /// and every other field is passed through untouched.
    pub fn from_fields(fields: &[(String, String)]) -> Result<Self, FetchError> {
        let value_of = |name: &str| {
            fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.trim())
        };

        let variant_id = match value_of("id") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| FetchError::InvalidForm(format!("variant id '{}' is not a positive integer", raw)))?,
            None => return Err(FetchError::InvalidForm("missing variant id".to_string())),
        };

        let quantity = match value_of("quantity") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|q| *q > 0)
                .ok_or_else(|| FetchError::InvalidForm(format!("quantity '{}' is not a positive integer", raw)))?,
            None => 1,
        };

        let properties = fields
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix("properties[")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(|name| (name.to_string(), v.clone()))
            })
            .collect();

        let mut fields = fields.to_vec();
        if !fields.iter().any(|(k, _)| k == "quantity") {
            fields.push(("quantity".to_string(), quantity.to_string()));
        }

        Ok(Self {
            variant_id,
            quantity,
            properties,
            fields,
        })
    }

    /// Form body, in submission order
    pub fn encode(&self) -> Vec<(String, String)> {
        self.fields.clone()
    }
}

/// Line item echoed back by the cart-add endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedLine {
    pub variant_id: u64,
    pub quantity: u32,
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AddPayload {
    Many { items: Vec<AddedLine> },
    One(AddedLine),
}

impl AddedLine {
    /// Read the line from a cart-add response. Multi-line answers yield their first line.
    pub fn from_response(response: &StorefrontResponse) -> Result<Self, FetchError> {
        match response.json::<AddPayload>()? {
            AddPayload::One(line) => Ok(line),
            AddPayload::Many { items } => items
                .into_iter()
                .next()
                .ok_or_else(|| FetchError::MalformedPayload("cart add returned no items".to_string())),
        }
    }
}

/// The part of the cart summary the counters display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CartSummary {
    pub item_count: u64,
}

/// Broadcast to independent listeners after a successful add
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Changed {
        line: AddedLine,
        /// `None` when the counter refresh failed
        item_count: Option<u64>,
    },
}
