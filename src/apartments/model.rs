//! Apartment entity model
//!
//! [`Apartment`] is the persisted record; [`NewApartment`] is the validated
//! creation payload decoded from a request body. The decode is lenient about
//! transport (JSON numbers or form-field strings) but strict about presence:
//! every field is required and absence fails creation instead of defaulting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::ValidationError;
use crate::media::store::ImageRef;
use crate::query::NumericField;

/// Geographic position of a listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A persisted apartment record
///
/// The identifier is assigned at creation and immutable afterwards; records
/// are never updated or deleted through the API surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub sqm: f64,
    pub number_bedrooms: i64,
    pub number_bathrooms: i64,
    pub coords: Coordinates,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Apartment {
    /// Materialize a record from a validated payload, assigning the
    /// identifier and both timestamps
    pub fn create(new: NewApartment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            price: new.price,
            sqm: new.sqm,
            number_bedrooms: new.number_bedrooms,
            number_bathrooms: new.number_bathrooms,
            coords: new.coords,
            created_at: now,
            updated_at: now,
        }
    }

    /// Read the value of a filterable numeric attribute
    pub fn numeric_field(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Price => self.price,
            NumericField::Sqm => self.sqm,
            NumericField::NumberBedrooms => self.number_bedrooms as f64,
            NumericField::NumberBathrooms => self.number_bathrooms as f64,
        }
    }

    /// Assemble the outbound shape: entity fields plus resolved image
    /// references
    pub fn with_images(self, images: Vec<ImageRef>) -> ApartmentWithImages {
        ApartmentWithImages {
            apartment: self,
            images,
        }
    }
}

/// Outbound payload shape: `{...apartment fields, images: [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct ApartmentWithImages {
    #[serde(flatten)]
    pub apartment: Apartment,
    pub images: Vec<ImageRef>,
}

/// A validated apartment creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewApartment {
    pub title: String,
    pub price: f64,
    pub sqm: f64,
    pub number_bedrooms: i64,
    pub number_bathrooms: i64,
    pub coords: Coordinates,
}

impl NewApartment {
    /// Decode and validate a creation payload
    ///
    /// Numeric fields accept JSON numbers or numeric strings, and `coords`
    /// accepts an object or a JSON-encoded object string, because multipart
    /// form fields arrive as text.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let title = require(payload, "title")?
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::MissingArgument {
                argument: "title".to_string(),
            })?
            .to_string();

        let price = float_field(require(payload, "price")?, "price")?;
        let sqm = float_field(require(payload, "sqm")?, "sqm")?;
        let number_bedrooms = integer_field(require(payload, "number_bedrooms")?, "number_bedrooms")?;
        let number_bathrooms =
            integer_field(require(payload, "number_bathrooms")?, "number_bathrooms")?;
        let coords = coords_field(require(payload, "coords")?)?;

        Ok(Self {
            title,
            price,
            sqm,
            number_bedrooms,
            number_bathrooms,
            coords,
        })
    }
}

fn require<'a>(payload: &'a Value, field: &str) -> Result<&'a Value, ValidationError> {
    match payload.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ValidationError::MissingArgument {
            argument: field.to_string(),
        }),
    }
}

fn float_field(value: &Value, field: &str) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::InvalidField {
        field: field.to_string(),
        message: "expected a number".to_string(),
    })
}

fn integer_field(value: &Value, field: &str) -> Result<i64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::InvalidField {
        field: field.to_string(),
        message: "expected an integer".to_string(),
    })
}

fn coords_field(value: &Value) -> Result<Coordinates, ValidationError> {
    let invalid = |message: &str| ValidationError::InvalidField {
        field: "coords".to_string(),
        message: message.to_string(),
    };

    let decoded;
    let object = match value {
        Value::String(encoded) => {
            decoded = serde_json::from_str::<Value>(encoded)
                .map_err(|_| invalid("expected a JSON object"))?;
            &decoded
        }
        other => other,
    };

    let lat = object
        .get("lat")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("expected numeric 'lat'"))?;
    let lon = object
        .get("lon")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("expected numeric 'lon'"))?;

    Ok(Coordinates { lat, lon })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "title": "A",
            "price": 100,
            "sqm": 10,
            "number_bedrooms": 2,
            "number_bathrooms": 2,
            "coords": { "lat": 10, "lon": 200 },
        })
    }

    #[test]
    fn test_decode_valid_payload() {
        let new = NewApartment::from_payload(&valid_payload()).unwrap();
        assert_eq!(new.title, "A");
        assert_eq!(new.price, 100.0);
        assert_eq!(new.number_bedrooms, 2);
        assert_eq!(new.coords, Coordinates { lat: 10.0, lon: 200.0 });
    }

    #[test]
    fn test_decode_form_field_strings() {
        // multipart form fields arrive as text
        let payload = json!({
            "title": "Loft am Kanal",
            "price": "1250.5",
            "sqm": "84",
            "number_bedrooms": "3",
            "number_bathrooms": "1",
            "coords": "{\"lat\": 52.49, \"lon\": 13.45}",
        });

        let new = NewApartment::from_payload(&payload).unwrap();
        assert_eq!(new.price, 1250.5);
        assert_eq!(new.sqm, 84.0);
        assert_eq!(new.number_bedrooms, 3);
        assert_eq!(new.coords.lat, 52.49);
    }

    #[test]
    fn test_every_field_is_required() {
        for field in [
            "title",
            "price",
            "sqm",
            "number_bedrooms",
            "number_bathrooms",
            "coords",
        ] {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().remove(field);

            let err = NewApartment::from_payload(&payload).unwrap_err();
            assert!(
                matches!(&err, ValidationError::MissingArgument { argument } if argument == field),
                "expected missing-argument error for '{}', got {:?}",
                field,
                err
            );
        }
    }

    #[test]
    fn test_null_field_counts_as_missing() {
        let mut payload = valid_payload();
        payload["price"] = Value::Null;
        let err = NewApartment::from_payload(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::MissingArgument { argument } if argument == "price"));
    }

    #[test]
    fn test_blank_title_counts_as_missing() {
        let mut payload = valid_payload();
        payload["title"] = json!("   ");
        let err = NewApartment::from_payload(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::MissingArgument { argument } if argument == "title"));
    }

    #[test]
    fn test_non_numeric_price_is_invalid() {
        let mut payload = valid_payload();
        payload["price"] = json!("expensive");
        let err = NewApartment::from_payload(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field, .. } if field == "price"));
    }

    #[test]
    fn test_fractional_bedroom_count_is_invalid() {
        let mut payload = valid_payload();
        payload["number_bedrooms"] = json!(2.5);
        let err = NewApartment::from_payload(&payload).unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidField { field, .. } if field == "number_bedrooms")
        );
    }

    #[test]
    fn test_coords_without_lon_is_invalid() {
        let mut payload = valid_payload();
        payload["coords"] = json!({ "lat": 10 });
        let err = NewApartment::from_payload(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field, .. } if field == "coords"));
    }

    #[test]
    fn test_create_assigns_identifier_and_timestamps() {
        let new = NewApartment::from_payload(&valid_payload()).unwrap();
        let a = Apartment::create(new.clone());
        let b = Apartment::create(new);

        // identical payloads still get distinct identifiers
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_numeric_field_lookup() {
        let new = NewApartment::from_payload(&valid_payload()).unwrap();
        let apartment = Apartment::create(new);

        assert_eq!(apartment.numeric_field(NumericField::Price), 100.0);
        assert_eq!(apartment.numeric_field(NumericField::Sqm), 10.0);
        assert_eq!(apartment.numeric_field(NumericField::NumberBedrooms), 2.0);
        assert_eq!(apartment.numeric_field(NumericField::NumberBathrooms), 2.0);
    }

    #[test]
    fn test_outbound_shape_flattens_entity_fields() {
        let new = NewApartment::from_payload(&valid_payload()).unwrap();
        let enriched = Apartment::create(new).with_images(vec![]);

        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["title"], "A");
        assert_eq!(value["images"], json!([]));
        assert!(value.get("apartment").is_none(), "fields must be flattened");
    }
}
