//! Typed request payloads and boundary validation.
//!
//! Bodies arrive as raw bytes. They are decoded into typed payloads whose
//! fields are all optional, then validated into domain inputs. Each failure
//! maps onto exactly one `PlantError`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PlantError, PlantResult};
use crate::plant::{NewPlant, PlantPatch};

/// Body of `POST /plants`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePlantRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
}

impl CreatePlantRequest {
    /// All of `name`, `image` and `price` must be present and non-null.
    pub fn into_new_plant(self) -> PlantResult<NewPlant> {
        match (self.name, self.image, self.price) {
            (Some(name), Some(image), Some(price)) => Ok(NewPlant { name, image, price }),
            _ => Err(PlantError::InvalidPayload),
        }
    }
}

/// Body of `PATCH /plants/{id}`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchPlantRequest {
    pub is_in_stock: Option<bool>,
}

impl PatchPlantRequest {
    pub fn into_patch(self) -> PlantPatch {
        PlantPatch {
            is_in_stock: self.is_in_stock,
        }
    }
}

/// Whether a `Content-Type` header value declares a JSON media type.
///
/// Accepts `application/json` (with or without parameters) and
/// `application/<subtype>+json`.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("application", "json")) => true,
        Some(("application", subtype)) => subtype.len() > "+json".len() && subtype.ends_with("+json"),
        _ => false,
    }
}

/// Validate a creation body.
///
/// A missing, malformed, or non-object body is invalid data, as is any object
/// lacking one of the required fields.
///
/// Field types are checked too: the payload is typed, so `{"name": 123, ...}`
/// or a string `price` is rejected as invalid data rather than stored as is.
pub fn parse_create_body(body: &[u8]) -> PlantResult<NewPlant> {
    let value: Value = serde_json::from_slice(body).map_err(|_| PlantError::InvalidPayload)?;
    if !value.is_object() {
        return Err(PlantError::InvalidPayload);
    }
    let req: CreatePlantRequest =
        serde_json::from_value(value).map_err(|_| PlantError::InvalidPayload)?;
    req.into_new_plant()
}

/// Validate an update body, in order: content type, presence, shape.
pub fn parse_patch_body(content_type: Option<&str>, body: &[u8]) -> PlantResult<PlantPatch> {
    if !is_json_content_type(content_type) {
        return Err(PlantError::InvalidContentType);
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| PlantError::NoBody)?;
    if value.is_null() {
        return Err(PlantError::NoBody);
    }
    if !value.is_object() {
        return Err(PlantError::InvalidPayload);
    }

    let req: PatchPlantRequest =
        serde_json::from_value(value).map_err(|_| PlantError::InvalidPayload)?;
    Ok(req.into_patch())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JSON: Option<&str> = Some("application/json");

    #[test]
    fn create_accepts_complete_payload() {
        let body = br#"{"name":"Fern","image":"fern.jpg","price":9.99}"#;
        let new = parse_create_body(body).unwrap();
        assert_eq!(new.name, "Fern");
        assert_eq!(new.image, "fern.jpg");
        assert_eq!(new.price, 9.99);
    }

    #[test]
    fn create_accepts_integer_price_and_ignores_extra_keys() {
        let body = br#"{"name":"Fern","image":"fern.jpg","price":10,"is_in_stock":false,"x":1}"#;
        let new = parse_create_body(body).unwrap();
        assert_eq!(new.price, 10.0);
    }

    #[test]
    fn create_rejects_missing_fields() {
        for body in [
            json!({"image": "a.jpg", "price": 1.0}),
            json!({"name": "a", "price": 1.0}),
            json!({"name": "a", "image": "a.jpg"}),
            json!({}),
        ] {
            let bytes = serde_json::to_vec(&body).unwrap();
            assert_eq!(parse_create_body(&bytes), Err(PlantError::InvalidPayload), "{body}");
        }
    }

    #[test]
    fn create_rejects_null_fields() {
        let body = br#"{"name":null,"image":"a.jpg","price":1.0}"#;
        assert_eq!(parse_create_body(body), Err(PlantError::InvalidPayload));
    }

    #[test]
    fn create_rejects_absent_malformed_and_non_object_bodies() {
        let bodies: [&[u8]; 5] = [b"", b"null", b"{", b"[1,2]", b"\"Fern\""];
        for body in bodies {
            assert_eq!(parse_create_body(body), Err(PlantError::InvalidPayload));
        }
    }

    #[test]
    fn create_rejects_mistyped_fields() {
        let body = br#"{"name":"Fern","image":"fern.jpg","price":"cheap"}"#;
        assert_eq!(parse_create_body(body), Err(PlantError::InvalidPayload));

        let body = br#"{"name":123,"image":"fern.jpg","price":9.99}"#;
        assert_eq!(parse_create_body(body), Err(PlantError::InvalidPayload));
    }

    #[test]
    fn content_type_matching() {
        assert!(is_json_content_type(Some("application/json")));
        assert!(is_json_content_type(Some("application/json; charset=utf-8")));
        assert!(is_json_content_type(Some("Application/JSON")));
        assert!(is_json_content_type(Some("application/merge-patch+json")));

        assert!(!is_json_content_type(None));
        assert!(!is_json_content_type(Some("")));
        assert!(!is_json_content_type(Some("text/plain")));
        assert!(!is_json_content_type(Some("text/json")));
        assert!(!is_json_content_type(Some("application/+json")));
        assert!(!is_json_content_type(Some("application/x-www-form-urlencoded")));
    }

    #[test]
    fn patch_checks_content_type_before_body() {
        assert_eq!(
            parse_patch_body(Some("text/plain"), b""),
            Err(PlantError::InvalidContentType)
        );
        assert_eq!(
            parse_patch_body(None, br#"{"is_in_stock":true}"#),
            Err(PlantError::InvalidContentType)
        );
    }

    #[test]
    fn patch_without_usable_json_is_no_body() {
        let bodies: [&[u8]; 3] = [b"", b"null", b"{not json"];
        for body in bodies {
            assert_eq!(parse_patch_body(JSON, body), Err(PlantError::NoBody));
        }
    }

    #[test]
    fn patch_with_wrong_shape_is_invalid_data() {
        let bodies: [&[u8]; 3] = [br#"[true]"#, b"5", br#"{"is_in_stock":"yes"}"#];
        for body in bodies {
            assert_eq!(parse_patch_body(JSON, body), Err(PlantError::InvalidPayload));
        }
    }

    #[test]
    fn patch_reads_stock_flag_and_ignores_the_rest() {
        let patch = parse_patch_body(JSON, br#"{"is_in_stock":false,"name":"Other"}"#).unwrap();
        assert_eq!(patch.is_in_stock, Some(false));

        let patch = parse_patch_body(JSON, br#"{"price":1}"#).unwrap();
        assert_eq!(patch, PlantPatch::default());

        let patch = parse_patch_body(JSON, br#"{"is_in_stock":null}"#).unwrap();
        assert_eq!(patch, PlantPatch::default());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any payload with all three fields validates and preserves them.
            #[test]
            fn complete_payloads_validate(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                image in "[a-z0-9/._-]{1,40}",
                price in 0.0f64..100_000.0,
            ) {
                let body = serde_json::to_vec(&json!({"name": &name, "image": &image, "price": price})).unwrap();
                let new = parse_create_body(&body).unwrap();
                prop_assert_eq!(new.name, name);
                prop_assert_eq!(new.image, image);
                prop_assert!((new.price - price).abs() <= 1e-9 * price.max(1.0));
            }

            /// Property: dropping any required field is always rejected.
            #[test]
            fn dropping_a_required_field_is_rejected(
                missing in prop::sample::select(vec!["name", "image", "price"]),
                name in "[A-Za-z]{1,20}",
            ) {
                let mut body = json!({"name": name, "image": "x.jpg", "price": 1.5});
                body.as_object_mut().unwrap().remove(missing);
                let bytes = serde_json::to_vec(&body).unwrap();
                prop_assert_eq!(parse_create_body(&bytes), Err(PlantError::InvalidPayload));
            }

            /// Property: unknown patch keys never affect the result.
            #[test]
            fn unknown_patch_keys_are_ignored(
                flag in any::<bool>(),
                key in "[a-z]{1,12}",
                extra in any::<i64>(),
            ) {
                prop_assume!(key != "is_in_stock");
                let mut body = json!({"is_in_stock": flag});
                body.as_object_mut().unwrap().insert(key, json!(extra));
                let bytes = serde_json::to_vec(&body).unwrap();
                let patch = parse_patch_body(JSON, &bytes).unwrap();
                prop_assert_eq!(patch.is_in_stock, Some(flag));
            }
        }
    }
}
