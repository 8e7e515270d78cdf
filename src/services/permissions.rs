//! Post visibility and ownership rules

use crate::models::{Post, User};

/// Whether `user` may edit or delete `post`.
pub fn can_manage(user: &User, post: &Post) -> bool {
    post.author_id == user.id || user.is_staff
}

/// Author restriction applied to the management listing: `None` for staff
/// (every post), the user's own id otherwise.
pub fn manage_scope(user: &User) -> Option<i64> {
    if user.is_staff {
        None
    } else {
        Some(user.id)
    }
}

/// Whether an anonymous reader may see `post` on the public pages.
pub fn is_publicly_visible(post: &Post) -> bool {
    post.is_published()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostState;

    fn user(id: i64, is_staff: bool) -> User {
        let mut user = User::new(format!("user{}", id), "hash");
        user.id = id;
        user.is_staff = is_staff;
        user
    }

    #[test]
    fn test_author_and_staff_can_manage() {
        let post = Post::new(1, 1, 10, "Mine");
        assert!(can_manage(&user(10, false), &post));
        assert!(!can_manage(&user(11, false), &post));
        assert!(can_manage(&user(11, true), &post));
    }

    #[test]
    fn test_manage_scope() {
        assert_eq!(manage_scope(&user(5, false)), Some(5));
        assert_eq!(manage_scope(&user(5, true)), None);
    }

    #[test]
    fn test_only_published_posts_are_public() {
        let mut post = Post::new(1, 1, 1, "Draft");
        assert!(!is_publicly_visible(&post));
        post.state = PostState::Published;
        assert!(is_publicly_visible(&post));
    }
}
