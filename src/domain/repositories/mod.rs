//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to the per-aggregate
//! repositories. Consumers request only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let customer = repos.customers().find_by_id("c1").await?;
//!     let user = repos.users().get_user_by_email("a@b.c").await?;
//! }
//! ```

use super::customer::CustomerRepository;
use super::user::UserRepositoryInterface;

pub trait RepositoryProvider: Send + Sync {
    fn customers(&self) -> &dyn CustomerRepository;
    fn users(&self) -> &dyn UserRepositoryInterface;
}
