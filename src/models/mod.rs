//! Data models
//!
//! Database entities (Blog, Section, Post, Revision, User, Session) and the
//! validation and pagination types shared by services, forms and handlers.

mod blog;
mod post;
mod revision;
mod section;
mod session;
mod user;
pub mod validation;

pub use blog::Blog;
pub use post::{
    ListParams, Markup, PagedResult, Post, PostState, SECRET_KEY_LENGTH, SLUG_MAX_LENGTH,
    TITLE_MAX_LENGTH,
};
pub use revision::Revision;
pub use section::{CreateSectionInput, Section, SECTION_NAME_MAX_LENGTH, SECTION_SLUG_MAX_LENGTH};
pub use session::Session;
pub use user::User;
pub use validation::ValidationError;
