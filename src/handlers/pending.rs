use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde_json::json;
use tracing::error;

use super::flatten_id;
use crate::state::AppState;

pub async fn submit_application(
    data: web::Json<Document>,
    state: web::Data<AppState>,
) -> HttpResponse {
    match state.pending_trainers().insert_one(data.into_inner()).await {
        Ok(result) => {
            let inserted_id = result.inserted_id.as_object_id().map(|id| id.to_hex());
            // body keeps the shape of the raw driver result the dashboard
            // already parses
            HttpResponse::Ok().json(json!({
                "users": { "acknowledged": true, "insertedId": inserted_id }
            }))
        }
        Err(err) => {
            error!(error = %err, "application insert failed");
            HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
        }
    }
}

pub async fn list_applications(state: web::Data<AppState>) -> HttpResponse {
    let cursor = match state.pending_trainers().find(doc! {}).await {
        Ok(cursor) => cursor,
        Err(err) => {
            error!(error = %err, "application listing failed");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Server error"
            }));
        }
    };

    match cursor.try_collect::<Vec<Document>>().await {
        Ok(applications) => {
            let applications: Vec<Document> =
                applications.into_iter().map(flatten_id).collect();
            HttpResponse::Ok().json(json!({ "users": applications }))
        }
        Err(err) => {
            error!(error = %err, "application listing failed");
            HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
        }
    }
}

pub async fn delete_application(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Invalid _id format"
            }))
        }
    };

    match state.pending_trainers().delete_one(doc! { "_id": id }).await {
        Ok(result) if result.deleted_count == 1 => {
            HttpResponse::Ok().json(json!({ "message": "Document deleted" }))
        }
        Ok(_) => HttpResponse::NotFound().json(json!({ "message": "Document not found" })),
        Err(err) => {
            error!(error = %err, "application delete failed");
            HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
        }
    }
}
