use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde_json::json;
use tracing::error;

use super::flatten_id;
use crate::state::AppState;

pub async fn create_class(
    data: web::Json<Document>,
    state: web::Data<AppState>,
) -> HttpResponse {
    match state.classes().insert_one(data.into_inner()).await {
        Ok(result) => {
            let inserted_id = result.inserted_id.as_object_id().map(|id| id.to_hex());
            HttpResponse::Ok().json(json!({
                "acknowledged": true,
                "insertedId": inserted_id
            }))
        }
        Err(err) => {
            error!(error = %err, "class insert failed");
            HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
        }
    }
}

pub async fn list_classes(state: web::Data<AppState>) -> HttpResponse {
    let cursor = match state.classes().find(doc! {}).await {
        Ok(cursor) => cursor,
        Err(err) => {
            error!(error = %err, "class listing failed");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Server error"
            }));
        }
    };

    match cursor.try_collect::<Vec<Document>>().await {
        // unlike the other listings this endpoint returns the bare array
        Ok(classes) => {
            let classes: Vec<Document> = classes.into_iter().map(flatten_id).collect();
            HttpResponse::Ok().json(classes)
        }
        Err(err) => {
            error!(error = %err, "class listing failed");
            HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
        }
    }
}

pub async fn delete_class(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Invalid class ID" }))
        }
    };

    match state.classes().delete_one(doc! { "_id": id }).await {
        Ok(result) if result.deleted_count == 0 => {
            HttpResponse::NotFound().json(json!({ "error": "Class not found" }))
        }
        Ok(_) => HttpResponse::Ok().json(json!({ "message": "Class deleted successfully" })),
        Err(err) => {
            error!(error = %err, "class delete failed");
            HttpResponse::InternalServerError().json(json!({
                "error": "Server error while deleting class"
            }))
        }
    }
}
