pub mod user;

pub use user::{NewUser, Role, TrainerApproval, TrainerProfile, TrainerStatus, User};
