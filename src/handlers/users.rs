use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::models::{NewUser, TrainerApproval, User};
use crate::services::roles::{RoleError, Transition};
use crate::state::AppState;

pub async fn register_user(
    data: web::Json<NewUser>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let new_user = data.into_inner();
    let users = state.user_docs();

    // one account per email
    match users.find_one(doc! { "email": &new_user.email }).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(json!({
                "message": "User already exists"
            }))
        }
        Ok(None) => {}
        Err(err) => {
            error!(error = %err, "user lookup failed");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Server error"
            }));
        }
    }

    match users.insert_one(new_user.into_document()).await {
        Ok(result) => {
            let user_id = result.inserted_id.as_object_id().map(|id| id.to_hex());
            HttpResponse::Created().json(json!({
                "message": "User inserted",
                "userId": user_id
            }))
        }
        Err(err) => {
            error!(error = %err, "user insert failed");
            HttpResponse::InternalServerError().json(json!({
                "error": "Server error"
            }))
        }
    }
}

pub async fn list_users(state: web::Data<AppState>) -> HttpResponse {
    let cursor = match state.users().find(doc! {}).await {
        Ok(cursor) => cursor,
        Err(err) => {
            error!(error = %err, "user listing failed");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Server error"
            }));
        }
    };

    match cursor.try_collect::<Vec<User>>().await {
        Ok(users) => HttpResponse::Ok().json(json!({ "users": users })),
        Err(err) => {
            error!(error = %err, "user listing failed");
            HttpResponse::InternalServerError().json(json!({
                "error": "Server error"
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserLookup {
    #[serde(rename = "_id")]
    id: Option<String>,
}

pub async fn get_user(
    query: web::Query<UserLookup>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let id = match query.into_inner().id {
        Some(id) if !id.is_empty() => id,
        _ => {
            return HttpResponse::BadRequest().json(json!({
                "error": "_id query parameter is required"
            }))
        }
    };
    let id = match ObjectId::parse_str(&id) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Invalid _id format"
            }))
        }
    };

    match state.users().find_one(doc! { "_id": id }).await {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "User not found" })),
        Err(err) => {
            error!(error = %err, "user lookup failed");
            HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
        }
    }
}

pub async fn approve_trainer(
    data: web::Json<TrainerApproval>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let body = data.into_inner();
    let email = body.trainer_email.clone();
    let grant = body.role;

    match state.roles.approve_trainer(email.as_deref(), grant, body.into_profile()).await {
        Ok(Transition::Applied) => HttpResponse::Ok().json(json!({
            "message": "Trainer info updated successfully"
        })),
        // the admin dashboard expects a no-op to read like a miss
        Ok(_) => HttpResponse::NotFound().json(json!({
            "error": "User not found or already updated"
        })),
        Err(RoleError::Store(err)) => {
            error!(error = %err, "trainer approval failed");
            HttpResponse::InternalServerError().json(json!({
                "error": "Server error while updating trainer"
            }))
        }
        Err(err) => HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
    }
}

pub async fn demote_trainer(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> HttpResponse {
    match state.roles.demote_trainer(&path.into_inner()).await {
        Ok(Transition::Applied) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Trainer role successfully changed to user"
        })),
        // matched a trainer but rewrote nothing, the record already holds
        // the demoted values
        Ok(Transition::NoChange) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Failed to update trainer role"
        })),
        Ok(Transition::NotFound) | Ok(Transition::RoleMismatch) => {
            HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "Trainer not found or user is not a trainer"
            }))
        }
        Err(RoleError::Store(err)) => {
            error!(error = %err, "trainer demotion failed");
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Internal server error"
            }))
        }
        Err(err) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": err.to_string()
        })),
    }
}

pub async fn promote_to_admin(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> HttpResponse {
    match state.roles.promote_to_admin(&path.into_inner()).await {
        Ok(Transition::Applied) => HttpResponse::Ok().json(json!({
            "message": "User successfully promoted to admin"
        })),
        Ok(_) => HttpResponse::NotFound().json(json!({
            "error": "User not found, already admin, or not a user"
        })),
        Err(RoleError::Store(err)) => {
            error!(error = %err, "admin promotion failed");
            HttpResponse::InternalServerError().json(json!({
                "error": "Server error while updating user role"
            }))
        }
        Err(err) => HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
    }
}
