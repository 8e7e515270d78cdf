//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories. They own
//! the business rules (validation, slugs, publication, ownership) and
//! translate storage failures into their own error types.

pub mod blog;
pub mod markup;
pub mod password;
pub mod permissions;
pub mod post;
pub mod section;
pub mod slug;
pub mod user;

pub use blog::BlogService;
pub use markup::MarkupRenderer;
pub use password::{hash_password, verify_password};
pub use permissions::{can_manage, is_publicly_visible, manage_scope};
pub use post::{PostService, PostServiceError};
pub use section::{SectionService, SectionServiceError};
pub use slug::{slug_for_title, slugify};
pub use user::{UserService, UserServiceError};
