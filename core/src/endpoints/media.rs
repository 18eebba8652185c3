//! Media metadata.

use crate::endpoint::Endpoint;
use crate::request::Disposable;
use crate::types::{MediaCollection, Wrapper};

/// `media/` on the versioned root, with the default header set.
pub(crate) fn base() -> Endpoint {
    Endpoint::version1()
        .appending_path("media")
        .appending_default_header()
}

/// Info for the media matching `identifier`.
pub fn summary(identifier: &str) -> Disposable<MediaCollection> {
    base()
        .appending_path(identifier)
        .appending_path("info")
        .prepare()
}

/// The public permalink for the media matching `identifier`.
pub fn permalink(identifier: &str) -> Disposable<Wrapper> {
    base()
        .appending_path(identifier)
        .appending_path("permalink")
        .prepare()
}
