mod db;
mod handlers;
mod models;
mod services;
mod state;

use actix_cors::Cors;
use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);
    let mongo_uri =
        std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let db = db::connect(&mongo_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let app_state = web::Data::new(AppState::new(db));

    info!(port, "starting gym backend");

    HttpServer::new(move || {
        // local dev frontend plus the published dashboard
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("https://gimox.surge.sh")
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(NormalizePath::trim())
            .wrap(cors)
            .app_data(app_state.clone())
            .route("/", web::get().to(handlers::index))
            .route("/health", web::get().to(handlers::health_check))

            .route("/api/users", web::post().to(handlers::users::register_user))
            .route("/api/allusers", web::get().to(handlers::users::list_users))
            .route("/api/user", web::get().to(handlers::users::get_user))
            .route("/api/users", web::patch().to(handlers::users::approve_trainer))
            .route("/api/users/role-to-user/{id}", web::patch().to(handlers::users::demote_trainer))
            .route("/api/user-to-admin/{id}", web::patch().to(handlers::users::promote_to_admin))

            .route("/api/pendingtrainer", web::post().to(handlers::pending::submit_application))
            .route("/api/pendingtrainer", web::get().to(handlers::pending::list_applications))
            .route("/api/pendingtrainer/{id}", web::delete().to(handlers::pending::delete_application))

            .route("/api/classes", web::post().to(handlers::classes::create_class))
            .route("/api/classes", web::get().to(handlers::classes::list_classes))
            .route("/api/classes/{id}", web::delete().to(handlers::classes::delete_class))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
