pub mod classes;
pub mod pending;
pub mod users;

use actix_web::HttpResponse;
use mongodb::bson::Document;
use serde_json::json;

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello World!")
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Stored documents carry `_id` as a raw ObjectId, which serializes to the
/// extended-JSON `{"$oid": ...}` form. The frontend reads it as a plain hex
/// string, so flatten it before responding.
pub(crate) fn flatten_id(mut doc: Document) -> Document {
    if let Ok(id) = doc.get_object_id("_id") {
        doc.insert("_id", id.to_hex());
    }
    doc
}
