//! Catalog round-trips against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every catalog
//! entry over real HTTP through a ureq-backed `Executor`. Validates request
//! rendering, cursor threading and decoding end-to-end.

use std::net::SocketAddr;

use gram_core::endpoints::{media, posts, stories};
use gram_core::{
    ApiConfig, ApiError, Executor, HttpMethod, HttpRequest, HttpResponse, Secret, UserCollection,
};

/// Executes requests with ureq, returning 4xx/5xx responses as data so the
/// core decides how to interpret them.
struct UreqExecutor {
    agent: ureq::Agent,
}

impl UreqExecutor {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Executor for UreqExecutor {
    type Error = ureq::Error;

    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ureq::Error> {
        let mut response = match req.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&req.url);
                for (key, value) in &req.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()?
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&req.url);
                for (key, value) in &req.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match &req.body {
                    Some(body) => builder.send(body.as_bytes())?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

/// Starts a fresh mock server on a random port.
fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn config(addr: SocketAddr) -> ApiConfig {
    ApiConfig::default().with_base_url(&format!("http://{addr}/api/v1"))
}

fn secret() -> Secret {
    Secret::from_cookies([
        ("ds_user_id", "1"),
        ("sessionid", "integration"),
        ("csrftoken", "token"),
    ])
    .unwrap()
}

#[test]
fn media_summary_and_permalink() {
    let cfg = config(spawn_server());
    let executor = UreqExecutor::new();

    let summary = media::summary("123")
        .configured(&cfg)
        .locking(&secret())
        .execute(&executor)
        .unwrap();
    assert_eq!(summary.items.len(), 1);
    let item = &summary.items[0];
    assert_eq!(item.like_count, 5);
    assert_eq!(item.comment_count, 5);
    assert_eq!(item.caption.as_ref().unwrap().text, "hello world");
    assert_eq!(item.user.as_ref().unwrap().pk, "1");

    let permalink = media::permalink("123")
        .configured(&cfg)
        .locking(&secret())
        .execute(&executor)
        .unwrap();
    assert_eq!(permalink["permalink"], "https://www.instagram.com/p/B123abc/");
}

#[test]
fn unknown_media_is_not_found() {
    let cfg = config(spawn_server());
    let err = media::summary("999")
        .configured(&cfg)
        .locking(&secret())
        .execute(&UreqExecutor::new())
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn unlocked_request_fails_before_dispatch() {
    let cfg = config(spawn_server());
    let err = media::summary("123")
        .configured(&cfg)
        .execute(&UreqExecutor::new())
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingCredential));
}

#[test]
fn likers_walk_every_page() {
    let cfg = config(spawn_server());
    let executor = UreqExecutor::new();
    let likers = posts::likers("123", None).configured(&cfg).locking(&secret());

    let pages: Vec<UserCollection> = likers.pages(&executor).collect::<Result<_, _>>().unwrap();
    assert_eq!(pages.len(), 3);
    let usernames: Vec<&str> = pages
        .iter()
        .flat_map(|p| p.users.iter())
        .map(|u| u.username.as_str())
        .collect();
    assert_eq!(usernames, ["liker10", "liker11", "liker12", "liker13", "liker14"]);
    assert!(pages.last().unwrap().next_max_id.is_none());

    // Resuming from a cursor picks up mid-way.
    let resumed = likers.starting_at(Some("2".to_string()));
    let users: usize = resumed
        .pages(&executor)
        .map(|page| page.unwrap().users.len())
        .sum();
    assert_eq!(users, 3);
}

#[test]
fn comments_follow_numeric_cursor() {
    let cfg = config(spawn_server());
    let comments = posts::comments("123", None).configured(&cfg).locking(&secret());

    let pages: Vec<_> = comments
        .pages(&UreqExecutor::new())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].next_max_id.as_deref(), Some("2"));
    assert_eq!(pages.iter().map(|p| p.comments.len()).sum::<usize>(), 5);
}

#[test]
fn save_and_unsave_round_trip() {
    let cfg = config(spawn_server());
    let executor = UreqExecutor::new();
    let summary = media::summary("123").configured(&cfg).locking(&secret());

    let status = posts::save("123")
        .configured(&cfg)
        .locking(&secret())
        .execute(&executor)
        .unwrap();
    assert!(status.is_ok());
    assert!(summary.execute(&executor).unwrap().items[0].has_viewer_saved);

    let status = posts::unsave("123")
        .configured(&cfg)
        .locking(&secret())
        .execute(&executor)
        .unwrap();
    assert!(status.is_ok());
    assert!(!summary.execute(&executor).unwrap().items[0].has_viewer_saved);
}

#[test]
fn comment_like_and_unlike() {
    let cfg = config(spawn_server());
    let executor = UreqExecutor::new();
    let first_page = posts::comments("123", None).configured(&cfg).locking(&secret());

    posts::like_comment("100")
        .configured(&cfg)
        .locking(&secret())
        .execute(&executor)
        .unwrap();
    let page = first_page.pages(&executor).next().unwrap().unwrap();
    assert!(page.comments[0].has_liked_comment);
    assert_eq!(page.comments[0].comment_like_count, 1);

    posts::unlike_comment("100")
        .configured(&cfg)
        .locking(&secret())
        .execute(&executor)
        .unwrap();
    let page = first_page.pages(&executor).next().unwrap().unwrap();
    assert!(!page.comments[0].has_liked_comment);

    let err = posts::like_comment("1")
        .configured(&cfg)
        .locking(&secret())
        .execute(&executor)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn story_viewers_and_archive() {
    let cfg = config(spawn_server());
    let executor = UreqExecutor::new();

    let viewers: usize = stories::viewers("555", None)
        .configured(&cfg)
        .locking(&secret())
        .pages(&executor)
        .map(|page| page.unwrap().users.len())
        .sum();
    assert_eq!(viewers, 3);

    let archived = stories::archived(None).configured(&cfg).locking(&secret());
    let days: Vec<String> = archived
        .pages(&executor)
        .flat_map(|page| page.unwrap().items)
        .map(|item| item.id)
        .collect();
    assert_eq!(
        days,
        ["archiveDay:2020-01-01", "archiveDay:2020-01-02", "archiveDay:2020-01-03"]
    );
}
