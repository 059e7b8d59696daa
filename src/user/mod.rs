//! User store: models, repository, and service.

mod models;
mod repository;
mod service;

pub use models::{CreateUserRequest, UpdateUserRequest, User, UserSummary};
pub use repository::UserRepository;
pub use service::UserService;
