//! Story viewers and the reel archive.

use crate::endpoint::Endpoint;
use crate::endpoints::media::base;
use crate::request::Paginated;
use crate::types::{TrayItemCollection, UserCollection};

/// Viewers of the story matching `identifier`, starting at `page`.
pub fn viewers(identifier: &str, page: Option<String>) -> Paginated<UserCollection> {
    base()
        .appending_path(identifier)
        .appending_path("list_reel_media_viewer")
        .paginating(page)
}

/// The logged-in user's archived stories, grouped by day.
pub fn archived(page: Option<String>) -> Paginated<TrayItemCollection> {
    Endpoint::version1()
        .appending_path("archive")
        .appending_path("reel")
        .appending_path("day_shells")
        .appending_default_header()
        .paginating(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::Secret;

    #[test]
    fn viewers_path() {
        assert_eq!(
            viewers("55", None).endpoint().path(),
            "/media/55/list_reel_media_viewer"
        );
    }

    #[test]
    fn archived_cursor_becomes_max_id() {
        let secret = Secret::from_cookies([("ds_user_id", "1"), ("sessionid", "s")]).unwrap();
        let request = archived(Some("2020-01-01".to_string()))
            .locking(&secret)
            .request()
            .unwrap();
        assert!(request
            .url
            .ends_with("/archive/reel/day_shells?max_id=2020-01-01"));
        assert!(request.header("User-Agent").is_some());
        assert!(request.header("Cookie").is_some());
    }
}
