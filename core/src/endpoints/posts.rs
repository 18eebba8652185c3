//! Post interactions: likers, comments, saving and comment likes.

use crate::endpoints::media::base;
use crate::http::HttpMethod;
use crate::request::{Disposable, Paginated};
use crate::types::{CommentCollection, Status, UserCollection};

/// Users liking the post matching `identifier`, starting at `page`.
pub fn likers(identifier: &str, page: Option<String>) -> Paginated<UserCollection> {
    base()
        .appending_path(identifier)
        .appending_path("likers")
        .paginating(page)
}

/// Comments on the post matching `identifier`, starting at `page`.
pub fn comments(identifier: &str, page: Option<String>) -> Paginated<CommentCollection> {
    base()
        .appending_path(identifier)
        .appending_path("comments")
        .paginating(page)
}

pub fn save(identifier: &str) -> Disposable<Status> {
    action(identifier, "save/")
}

pub fn unsave(identifier: &str) -> Disposable<Status> {
    action(identifier, "unsave/")
}

/// Like the comment matching `identifier`.
pub fn like_comment(identifier: &str) -> Disposable<Status> {
    action(identifier, "comment_like/")
}

/// Unlike the comment matching `identifier`.
pub fn unlike_comment(identifier: &str) -> Disposable<Status> {
    action(identifier, "comment_unlike/")
}

fn action(identifier: &str, verb: &str) -> Disposable<Status> {
    base()
        .appending_path(identifier)
        .appending_path(verb)
        .replacing_method(HttpMethod::Post)
        .prepare()
}
