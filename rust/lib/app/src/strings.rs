//! User-facing notification texts.

pub const SOMETHING_WENT_WRONG: &str = "Something went wrong...";

pub const LOGGED_IN: &str = "Logged in successfully";
pub const AUTH_FAILED: &str = "Failed to authenticate...";
pub const REGISTERED: &str = "Now you can login to your account";
pub const REGISTER_FAILED: &str = "Failed to register...";
pub const SESSION_EXPIRED: &str = "Your session has expired, please log in again";

pub const POST_NOT_FOUND: &str = "The post you are looking for does not exist.";
pub const POST_UPDATED: &str = "Post updated";
pub const POST_UPDATE_FAILED: &str = "Failed to update post...";
pub const POST_FAVOURITED: &str = "Post added to favourites";
pub const POST_UNFAVOURITED: &str = "Post removed from favourites";
pub const POST_DELETED: &str = "Post deleted";
pub const POST_DELETE_FAILED: &str = "Failed to delete post...";
pub const POST_CREATED: &str = "Your post has been created successfully.";
pub const POST_CREATE_FAILED: &str = "Failed to create post...";
pub const BODY_REQUIRED: &str = "Body is required!";

pub const COMMENT_ADDED: &str = "Comment added";
pub const COMMENT_DELETED: &str = "Comment deleted";

pub const PROFILE_NOT_FOUND: &str = "The profile you are looking for does not exist...";
pub const FOLLOW_FAILED: &str = "Could not follow user...";
pub const UNFOLLOW_FAILED: &str = "Could not unfollow user...";

pub fn now_following(username: &str) -> String {
    format!("You are now following user: {username}")
}

pub fn no_longer_following(username: &str) -> String {
    format!("You are no longer following user: {username}")
}
