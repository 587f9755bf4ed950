use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Kind of media a post carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "post_file_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
}

impl FileType {
    /// Classify a declared content type: `video/*` is a video, everything else an image.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            FileType::Video
        } else {
            FileType::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
        }
    }
}

/// A persisted post. Created fully formed, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Post {
    pub id: Uuid,
    pub caption: String,
    pub url: String,
    pub file_type: FileType,
    /// Name assigned by the remote media host, not the client's filename.
    pub file_name: String,
    #[serde(serialize_with = "serialize_created_at")]
    pub created_at: DateTime<Utc>,
}

/// RFC 3339 with microseconds and a `+00:00` offset, the form used on every endpoint.
pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    created_at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn serialize_created_at<S>(created_at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_created_at(created_at))
}

/// Fields supplied when inserting a post; `id` and `created_at` come from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub caption: String,
    pub url: String,
    pub file_type: FileType,
    pub file_name: String,
}

/// Feed projection of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PostView {
    pub id: String,
    pub caption: String,
    pub url: String,
    pub file_type: FileType,
    pub file_name: String,
    /// ISO-8601 timestamp
    pub created_at: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_string(),
            caption: post.caption,
            url: post.url,
            file_type: post.file_type,
            file_name: post.file_name,
            created_at: format_created_at(&post.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedResponse {
    pub posts: Vec<PostView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_file_type_from_content_type() {
        assert_eq!(FileType::from_content_type("video/mp4"), FileType::Video);
        assert_eq!(FileType::from_content_type("video/quicktime"), FileType::Video);
        assert_eq!(FileType::from_content_type("image/jpeg"), FileType::Image);
        assert_eq!(
            FileType::from_content_type("application/octet-stream"),
            FileType::Image
        );
        // Prefix match is case sensitive, like the declared header value
        assert_eq!(FileType::from_content_type("Video/mp4"), FileType::Image);
        assert_eq!(FileType::from_content_type(""), FileType::Image);
    }

    #[test]
    fn test_file_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(FileType::Video).unwrap(), "video");
        assert_eq!(serde_json::to_value(FileType::Image).unwrap(), "image");
        assert_eq!(FileType::Video.as_str(), "video");
    }

    #[test]
    fn test_post_view_projection() {
        let id = Uuid::new_v4();
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let post = Post {
            id,
            caption: "hi".to_string(),
            url: "https://host/x.jpg".to_string(),
            file_type: FileType::Image,
            file_name: "x.jpg".to_string(),
            created_at,
        };

        let view = PostView::from(post);
        assert_eq!(view.id, id.to_string());
        assert_eq!(view.caption, "hi");
        assert_eq!(view.file_name, "x.jpg");
        assert_eq!(view.created_at, "2024-05-01T12:30:00.000000+00:00");

        let parsed = DateTime::parse_from_rfc3339(&view.created_at).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), created_at);
    }

    #[test]
    fn test_post_json_shape() {
        let post = Post {
            id: Uuid::new_v4(),
            caption: String::new(),
            url: "https://host/v.mp4".to_string(),
            file_type: FileType::Video,
            file_name: "v.mp4".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&post).unwrap();
        for key in ["id", "caption", "url", "file_type", "file_name", "created_at"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["file_type"], "video");
        assert_eq!(json["caption"], "");
    }

    #[test]
    fn test_post_and_view_share_timestamp_format() {
        let created_at = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 42)
            .unwrap()
            .with_nanosecond(529_809_802)
            .unwrap();
        let post = Post {
            id: Uuid::new_v4(),
            caption: String::new(),
            url: "https://host/x.jpg".to_string(),
            file_type: FileType::Image,
            file_name: "x.jpg".to_string(),
            created_at,
        };

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T12:30:42.529809+00:00");
        assert_eq!(json["created_at"], PostView::from(post).created_at.as_str());

        let parsed: Post = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.created_at.timestamp_micros(), created_at.timestamp_micros());
    }
}
