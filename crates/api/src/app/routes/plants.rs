use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use nursery_infra::PlantUnitOfWork;
use nursery_plants::{Plant, PlantError, PlantId};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_plants).post(create_plant))
        .route(
            "/:id",
            get(get_plant).patch(update_plant).delete(delete_plant),
        )
}

pub async fn list_plants(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let mut uow = match services.begin().await {
        Ok(u) => u,
        Err(e) => return errors::store_error_to_response(e),
    };

    match uow.find_all().await {
        Ok(plants) => (StatusCode::OK, Json(plants)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_plant(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let new = match nursery_plants::parse_create_body(&body) {
        Ok(v) => v,
        Err(e) => return errors::plant_error_to_response(e),
    };

    let mut uow = match services.begin().await {
        Ok(u) => u,
        Err(e) => return errors::store_error_to_response(e),
    };
    let plant = match uow.insert(new).await {
        Ok(p) => p,
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = uow.commit().await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(plant_id = %plant.id, name = %plant.name, "plant created");
    (StatusCode::CREATED, Json(plant)).into_response()
}

pub async fn get_plant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mut uow = match services.begin().await {
        Ok(u) => u,
        Err(e) => return errors::store_error_to_response(e),
    };

    match load_plant(uow.as_mut(), &id).await {
        Ok(plant) => (StatusCode::OK, Json(plant)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_plant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let mut uow = match services.begin().await {
        Ok(u) => u,
        Err(e) => return errors::store_error_to_response(e),
    };

    // Existence is checked before anything about the body.
    let mut plant = match load_plant(uow.as_mut(), &id).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    tracing::debug!(plant_id = %plant.id, content_type = ?content_type, "patch received");

    let patch = match nursery_plants::parse_patch_body(content_type, &body) {
        Ok(p) => p,
        Err(e) => return errors::plant_error_to_response(e),
    };
    tracing::debug!(plant_id = %plant.id, ?patch, "patch parsed");

    if plant.apply(&patch) {
        if let Err(e) = uow.update(&plant).await {
            return errors::store_error_to_response(e);
        }
    }
    if let Err(e) = uow.commit().await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(plant_id = %plant.id, is_in_stock = plant.is_in_stock, "plant updated");
    (StatusCode::OK, Json(plant)).into_response()
}

pub async fn delete_plant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mut uow = match services.begin().await {
        Ok(u) => u,
        Err(e) => return errors::store_error_to_response(e),
    };

    let plant = match load_plant(uow.as_mut(), &id).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if let Err(e) = uow.delete(plant.id).await {
        return errors::store_error_to_response(e);
    }
    if let Err(e) = uow.commit().await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(plant_id = %plant.id, "plant deleted");
    StatusCode::NO_CONTENT.into_response()
}

/// Resolve a path segment to an existing plant, or the 404 response.
async fn load_plant(
    uow: &mut dyn PlantUnitOfWork,
    raw_id: &str,
) -> Result<Plant, axum::response::Response> {
    let id: PlantId = raw_id.parse().map_err(errors::plant_error_to_response)?;

    match uow.find_by_id(id).await {
        Ok(Some(plant)) => Ok(plant),
        Ok(None) => Err(errors::plant_error_to_response(PlantError::NotFound)),
        Err(e) => Err(errors::store_error_to_response(e)),
    }
}
