//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the queries for a specific entity.

pub mod blog;
pub mod post;
pub mod revision;
pub mod section;
pub mod session;
pub mod user;

pub use blog::{BlogRepository, SqlxBlogRepository};
pub use post::{PostFilter, PostOrder, PostRepository, SqlxPostRepository};
pub use revision::{RevisionRepository, SqlxRevisionRepository};
pub use section::{SectionRepository, SqlxSectionRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use user::{SqlxUserRepository, UserRepository};
