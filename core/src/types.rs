//! Response shapes for the catalog.
//!
//! # Design
//! Only the fields callers commonly need are modelled; everything else in a
//! payload is ignored. Identifiers and cursors arrive as JSON strings on some
//! endpoints and as numbers on others, so both are accepted and normalized to
//! `String`.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::request::Page;

/// Generic untyped payload.
pub type Wrapper = serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub pk: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Media {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub media_type: u8,
    #[serde(default)]
    pub taken_at: Option<i64>,
    #[serde(default)]
    pub caption: Option<Caption>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub has_viewer_saved: bool,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    #[serde(deserialize_with = "string_or_number")]
    pub pk: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub comment_like_count: u64,
    #[serde(default)]
    pub has_liked_comment: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// One day of archived stories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrayItem {
    pub id: String,
    #[serde(default)]
    pub media_count: u64,
    #[serde(default)]
    pub latest_reel_media: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaCollection {
    #[serde(default)]
    pub items: Vec<Media>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCollection {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default, deserialize_with = "optional_cursor")]
    pub next_max_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentCollection {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default, deserialize_with = "optional_cursor")]
    pub next_max_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrayItemCollection {
    #[serde(default)]
    pub items: Vec<TrayItem>,
    #[serde(default, deserialize_with = "optional_cursor")]
    pub next_max_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Bare acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Status {
    pub status: String,
}

impl Status {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

impl Page for UserCollection {
    fn next_cursor(&self) -> Option<Cow<'_, str>> {
        self.next_max_id.as_deref().map(Cow::Borrowed)
    }
}

impl Page for CommentCollection {
    fn next_cursor(&self) -> Option<Cow<'_, str>> {
        self.next_max_id.as_deref().map(Cow::Borrowed)
    }
}

impl Page for TrayItemCollection {
    fn next_cursor(&self) -> Option<Cow<'_, str>> {
        self.next_max_id.as_deref().map(Cow::Borrowed)
    }
}

impl Page for Wrapper {
    fn next_cursor(&self) -> Option<Cow<'_, str>> {
        match self.get("next_max_id")? {
            Value::String(cursor) if !cursor.is_empty() => Some(Cow::Borrowed(cursor.as_str())),
            Value::Number(cursor) => Some(Cow::Owned(cursor.to_string())),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_cursor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let cursor = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(cursor.map(String::from).filter(|c| !c.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cursor_is_normalized() {
        let page: UserCollection =
            serde_json::from_str(r#"{"users":[],"next_max_id":17841400,"status":"ok"}"#).unwrap();
        assert_eq!(page.next_cursor().as_deref(), Some("17841400"));
    }

    #[test]
    fn empty_or_null_cursor_means_last_page() {
        let page: CommentCollection =
            serde_json::from_str(r#"{"comments":[],"next_max_id":""}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
        let page: CommentCollection =
            serde_json::from_str(r#"{"comments":[],"next_max_id":null}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
        let page: TrayItemCollection = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn numeric_user_pk_is_accepted() {
        let user: User = serde_json::from_str(r#"{"pk":25025320,"username":"instagram"}"#).unwrap();
        assert_eq!(user.pk, "25025320");
        assert_eq!(user.full_name, "");
    }

    #[test]
    fn media_collection_ignores_unknown_fields() {
        let body = r#"{
            "items": [{"id": "123_42", "code": "B1", "media_type": 1, "like_count": 7,
                       "caption": {"text": "hello", "pk": 9}, "extra": true}],
            "num_results": 1,
            "status": "ok"
        }"#;
        let collection: MediaCollection = serde_json::from_str(body).unwrap();
        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.items[0].like_count, 7);
        assert_eq!(collection.items[0].caption.as_ref().unwrap().text, "hello");
    }

    #[test]
    fn wrapper_reads_string_cursor() {
        let value: Wrapper = serde_json::json!({"items": [], "next_max_id": "abc"});
        assert_eq!(value.next_cursor().as_deref(), Some("abc"));
    }

    #[test]
    fn wrapper_normalizes_numeric_cursor() {
        let value: Wrapper = serde_json::json!({"items": [], "next_max_id": 42});
        assert_eq!(value.next_cursor().as_deref(), Some("42"));
    }

    #[test]
    fn wrapper_empty_or_missing_cursor_means_last_page() {
        let value: Wrapper = serde_json::json!({"items": [], "next_max_id": ""});
        assert_eq!(value.next_cursor(), None);
        let value: Wrapper = serde_json::json!({"items": [], "next_max_id": null});
        assert_eq!(value.next_cursor(), None);
        let value: Wrapper = serde_json::json!({"items": []});
        assert_eq!(value.next_cursor(), None);
    }
}
