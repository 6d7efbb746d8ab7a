use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CreateUserDto, UpdateUserDto, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    /// All users, newest first.
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>>;
    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()>;
    async fn set_active(&self, id: &str, is_active: bool) -> DomainResult<Option<User>>;
    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;
}
