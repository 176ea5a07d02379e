use mongodb::bson::Document;
use mongodb::{Collection, Database};

use crate::db;
use crate::models::User;
use crate::services::roles::RoleService;
use crate::services::store::MongoUsers;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub roles: RoleService<MongoUsers>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let roles = RoleService::new(MongoUsers::new(db.collection(db::USERS)));
        Self { db, roles }
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection(db::USERS)
    }

    // registration works on raw documents so client-supplied shapes survive
    pub fn user_docs(&self) -> Collection<Document> {
        self.db.collection(db::USERS)
    }

    pub fn pending_trainers(&self) -> Collection<Document> {
        self.db.collection(db::PENDING_TRAINERS)
    }

    pub fn classes(&self) -> Collection<Document> {
        self.db.collection(db::CLASSES)
    }
}
