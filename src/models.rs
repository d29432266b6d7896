use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical identity record stored in the `users` table. The password hash
/// is carried for credential verification but never leaves the process: it is
/// excluded from serialization entirely.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    // Argon2 PHC string. Never serialized into any response payload.
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password_hash: String,
    // The RBAC field: 'user' or 'admin'.
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post
///
/// A blog post row from the `posts` table. Tags live in the `post_tags` join
/// table and are attached when the row is mapped into a `PostResponse`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Post {
    pub id: i64,
    // FK to users.id (Owner).
    pub user_id: Uuid,
    // FK to categories.id.
    pub category_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment
///
/// A comment row from the `comments` table, augmented with the author's
/// username (a join operation performed in the repository).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    // FK to users.id (Owner).
    pub user_id: Uuid,
    pub body: String,
    // Loaded via a JOIN with the users table.
    #[sqlx(default)]
    pub author_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Album
///
/// An album row from the `albums` table. Its photos are not embedded in listing
/// payloads; they are served by the dedicated `/api/albums/{id}/photos` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Album {
    pub id: i64,
    // FK to users.id (Owner).
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Photo
///
/// A photo row from the `photos` table. Ownership is indirect: a photo belongs
/// to whoever owns its album.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Photo {
    pub id: i64,
    // FK to albums.id.
    pub album_id: i64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tag
///
/// A tag row from the `tags` table. `created_by` anchors the ownership check
/// for updates and deletes; the name carries a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    // FK to users.id (Creator).
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category
///
/// A category row from the `categories` table. Same ownership and uniqueness
/// rules as `Tag`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Category {
    pub id: i64,
    pub name: String,
    // FK to users.id (Creator).
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// SignUpRequest
///
/// Input payload for the public registration endpoint (POST /api/auth/signup).
/// The password is hashed with Argon2 before it ever reaches the repository.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "First name cannot be blank"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name cannot be blank"))]
    pub last_name: String,
    #[validate(length(min = 3, max = 15, message = "Username must be between 3 and 15 characters"))]
    pub username: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters"))]
    pub password: String,
}

/// LoginRequest
///
/// Input payload for POST /api/auth/signin. The identifier matches either the
/// username or the email column.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email cannot be blank"))]
    pub username_or_email: String,
    #[validate(length(min = 1, message = "Password cannot be blank"))]
    pub password: String,
}

/// PostRequest
///
/// Input payload for creating or fully updating a post. Tags are referenced by
/// name; unknown names are created on the fly by the repository.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct PostRequest {
    #[validate(length(min = 10, message = "Post title must be at least 10 characters"))]
    pub title: String,
    #[validate(length(min = 50, message = "Post body must be at least 50 characters"))]
    pub body: String,
    pub category_id: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// CommentRequest
///
/// Input payload for creating or updating a comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct CommentRequest {
    #[validate(length(min = 10, message = "Comment body must be at least 10 characters"))]
    pub body: String,
}

/// AlbumRequest
///
/// Input payload for creating or updating an album.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct AlbumRequest {
    #[validate(length(min = 1, message = "Album title cannot be blank"))]
    pub title: String,
}

/// PhotoRequest
///
/// Input payload for creating or updating a photo. The album must belong to
/// the caller (or the caller must be an admin).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct PhotoRequest {
    #[validate(length(min = 1, message = "Photo title cannot be blank"))]
    pub title: String,
    #[validate(url(message = "Photo url must be a valid URL"))]
    pub url: String,
    #[validate(url(message = "Photo thumbnail url must be a valid URL"))]
    pub thumbnail_url: String,
    pub album_id: i64,
}

/// TagRequest
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct TagRequest {
    #[validate(length(min = 1, message = "Tag name cannot be blank"))]
    pub name: String,
}

/// CategoryRequest
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "Category name cannot be blank"))]
    pub name: String,
}

/// UpdateUserRequest
///
/// Partial update payload for modifying a user account (PUT /api/users/{username}).
///
/// *Note*: Every field is an `Option`; absent fields leave the stored value
/// untouched, and `skip_serializing_if` keeps them out of round-tripped JSON.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "First name cannot be blank"))]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Last name cannot be blank"))]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters"))]
    pub password: Option<String>,
}

// --- Response Payloads (Output Schemas) ---

/// ApiResponse
///
/// The uniform acknowledgement body: success acks for deletes and role changes,
/// and (with `success = false`) every error payload produced by `ApiError`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// JwtAuthenticationResponse
///
/// Output of a successful signin: the bearer token the client attaches to
/// subsequent requests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct JwtAuthenticationResponse {
    pub access_token: String,
    pub token_type: String,
}

impl JwtAuthenticationResponse {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
        }
    }
}

/// PostResponse
///
/// The API-facing shape of a post: the row fields plus the attached tag names.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct PostResponse {
    pub id: i64,
    pub user_id: Uuid,
    pub category_id: i64,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostResponse {
    /// Maps a post row and its resolved tag names into the response DTO.
    pub fn from_entity(post: Post, tags: Vec<String>) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            category_id: post.category_id,
            title: post.title,
            body: post.body,
            tags,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// UserSummary
///
/// Output schema for the authenticated user's own identity (GET /api/users/me).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// UserProfile
///
/// Public profile view (GET /api/users/{username}/profile), enriched with the
/// user's post count.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub joined_at: DateTime<Utc>,
    pub post_count: i64,
}

/// UserIdentityAvailability
///
/// Output of the username/email availability probes used by signup forms.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UserIdentityAvailability {
    pub available: bool,
}

// --- Internal Repository Inputs (never serialized to clients) ---

/// NewUser
///
/// The fully-resolved insert payload for the users table: the handler has
/// already hashed the password and decided the role by the time this exists.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
}

/// UserUpdate
///
/// Column-level patch for the users table; `None` leaves a column untouched
/// (applied with COALESCE in the repository).
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
