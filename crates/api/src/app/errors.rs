use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use nursery_infra::StoreError;
use nursery_plants::PlantError;

pub fn plant_error_to_response(err: PlantError) -> axum::response::Response {
    let status = match err {
        PlantError::NotFound => StatusCode::NOT_FOUND,
        PlantError::InvalidPayload | PlantError::InvalidContentType | PlantError::NoBody => {
            StatusCode::BAD_REQUEST
        }
    };
    json_error(status, err.to_string())
}

/// Storage failures never expose their detail to the client.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        // The row vanished between lookup and write (concurrent delete).
        StoreError::Missing(_) => plant_error_to_response(PlantError::NotFound),
        StoreError::Database(_) | StoreError::Unavailable(_) => {
            tracing::error!("plant store failure: {err}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nursery_plants::PlantId;

    #[test]
    fn plant_errors_map_to_4xx() {
        assert_eq!(plant_error_to_response(PlantError::NotFound).status(), StatusCode::NOT_FOUND);
        for err in [PlantError::InvalidPayload, PlantError::InvalidContentType, PlantError::NoBody] {
            assert_eq!(plant_error_to_response(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn store_errors_map_to_5xx_except_missing_rows() {
        assert_eq!(
            store_error_to_response(StoreError::Database("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            store_error_to_response(StoreError::Unavailable("closed".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            store_error_to_response(StoreError::Missing(PlantId::new(3))).status(),
            StatusCode::NOT_FOUND
        );
    }
}
