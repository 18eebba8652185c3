//! Typed endpoint catalog for the Instagram private API.
//!
//! # Overview
//! Builds `HttpRequest` values and decodes `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller supplies an
//! [`Executor`] or runs the round-trip itself between `request()` and
//! `parse()`.
//!
//! # Design
//! - `Endpoint` is an immutable descriptor; every builder step returns a new
//!   value.
//! - `Disposable<T>` yields one decoded `T`; `Paginated<T>` yields a lazy
//!   sequence of pages linked by `max_id` cursors.
//! - Requests must be `locking`-ed with a `Secret` before they render.
//! - The catalog in [`endpoints`] is plain data: path, method and result type.
//!
//! ```
//! use gram_core::{endpoints::posts, Secret};
//!
//! let secret = Secret::from_cookies([("ds_user_id", "1"), ("sessionid", "abc")]).unwrap();
//! let request = posts::save("123").locking(&secret).request().unwrap();
//! assert!(request.url.ends_with("/media/123/save/"));
//! ```

pub mod config;
pub mod endpoint;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod request;
pub mod secret;
pub mod types;

pub use config::ApiConfig;
pub use endpoint::Endpoint;
pub use error::{ApiError, Result};
pub use http::{Executor, HttpMethod, HttpRequest, HttpResponse};
pub use request::{Disposable, Page, Pages, Paginated};
pub use secret::Secret;
pub use types::{
    Comment, CommentCollection, Media, MediaCollection, Status, TrayItem, TrayItemCollection, User,
    UserCollection, Wrapper,
};
