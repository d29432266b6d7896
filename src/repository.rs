use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::{
    Album, AlbumRequest, Category, Comment, NewUser, Photo, PhotoRequest, Post, PostRequest,
    PostResponse, Tag, User, UserUpdate,
};

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the concrete implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
///
/// Every method surfaces database failures as `sqlx::Error` so the handler layer
/// can translate them uniformly (unique violations become 400s, the rest 500s).
/// Listing methods return the page of rows together with the unfiltered total,
/// which the handlers feed into the pagination envelope.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users / Auth ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
    // Signin accepts either identifier in a single field.
    async fn get_user_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error>;
    async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error>;
    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error>;
    // Drives the first-account-becomes-admin rule at signup.
    async fn count_users(&self) -> Result<i64, sqlx::Error>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, sqlx::Error>;
    // Column-level patch; None fields are left untouched via COALESCE.
    async fn update_user(&self, id: Uuid, update: UserUpdate)
        -> Result<Option<User>, sqlx::Error>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    // Admin action: flips the role column ('user' <-> 'admin').
    async fn set_user_role(&self, id: Uuid, role: &str) -> Result<Option<User>, sqlx::Error>;
    // Feeds the post_count field of the public profile view.
    async fn count_posts_by_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    // --- Posts ---
    async fn list_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error>;
    async fn list_posts_by_category(
        &self,
        category_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error>;
    async fn list_posts_by_tag(
        &self,
        tag_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error>;
    async fn get_post(&self, id: i64) -> Result<Option<PostResponse>, sqlx::Error>;
    // Transactional: inserts the row, resolves tag names (creating missing
    // tags) and links them, all or nothing.
    async fn create_post(
        &self,
        user_id: Uuid,
        req: &PostRequest,
    ) -> Result<PostResponse, sqlx::Error>;
    // Transactional full replace, including the tag set.
    async fn update_post(
        &self,
        id: i64,
        req: &PostRequest,
    ) -> Result<Option<PostResponse>, sqlx::Error>;
    async fn delete_post(&self, id: i64) -> Result<bool, sqlx::Error>;

    // --- Comments ---
    async fn list_comments(
        &self,
        post_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Comment>, i64), sqlx::Error>;
    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, sqlx::Error>;
    async fn create_comment(
        &self,
        post_id: i64,
        user_id: Uuid,
        body: &str,
    ) -> Result<Comment, sqlx::Error>;
    async fn update_comment(&self, id: i64, body: &str) -> Result<Option<Comment>, sqlx::Error>;
    async fn delete_comment(&self, id: i64) -> Result<bool, sqlx::Error>;

    // --- Albums ---
    async fn list_albums(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Album>, i64), sqlx::Error>;
    async fn get_album(&self, id: i64) -> Result<Option<Album>, sqlx::Error>;
    async fn create_album(
        &self,
        user_id: Uuid,
        req: &AlbumRequest,
    ) -> Result<Album, sqlx::Error>;
    async fn update_album(
        &self,
        id: i64,
        req: &AlbumRequest,
    ) -> Result<Option<Album>, sqlx::Error>;
    async fn delete_album(&self, id: i64) -> Result<bool, sqlx::Error>;

    // --- Photos ---
    async fn list_photos(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Photo>, i64), sqlx::Error>;
    async fn list_photos_by_album(
        &self,
        album_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Photo>, i64), sqlx::Error>;
    async fn get_photo(&self, id: i64) -> Result<Option<Photo>, sqlx::Error>;
    async fn create_photo(&self, req: &PhotoRequest) -> Result<Photo, sqlx::Error>;
    async fn update_photo(&self, id: i64, req: &PhotoRequest)
        -> Result<Option<Photo>, sqlx::Error>;
    async fn delete_photo(&self, id: i64) -> Result<bool, sqlx::Error>;

    // --- Tags ---
    async fn list_tags(&self, limit: i64, offset: i64) -> Result<(Vec<Tag>, i64), sqlx::Error>;
    async fn get_tag(&self, id: i64) -> Result<Option<Tag>, sqlx::Error>;
    async fn create_tag(&self, user_id: Uuid, name: &str) -> Result<Tag, sqlx::Error>;
    async fn update_tag(&self, id: i64, name: &str) -> Result<Option<Tag>, sqlx::Error>;
    async fn delete_tag(&self, id: i64) -> Result<bool, sqlx::Error>;

    // --- Categories ---
    async fn list_categories(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Category>, i64), sqlx::Error>;
    async fn get_category(&self, id: i64) -> Result<Option<Category>, sqlx::Error>;
    async fn create_category(&self, user_id: Uuid, name: &str) -> Result<Category, sqlx::Error>;
    async fn update_category(&self, id: i64, name: &str)
        -> Result<Option<Category>, sqlx::Error>;
    async fn delete_category(&self, id: i64) -> Result<bool, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolves the tag names for a page of posts in a single query and folds
    /// them into response payloads, preserving the page order.
    async fn attach_tags(&self, posts: Vec<Post>) -> Result<Vec<PostResponse>, sqlx::Error> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        let rows = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT pt.post_id, t.name
            FROM post_tags pt
            JOIN tags t ON pt.tag_id = t.id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.name ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_post: HashMap<i64, Vec<String>> = HashMap::new();
        for (post_id, name) in rows {
            tags_by_post.entry(post_id).or_default().push(name);
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let tags = tags_by_post.remove(&post.id).unwrap_or_default();
                PostResponse::from_entity(post, tags)
            })
            .collect())
    }
}

/// link_tags
///
/// Replaces a post's tag set inside an open transaction: every name is resolved
/// to a tag row (missing ones are created and attributed to `user_id`), and the
/// post_tags links are rebuilt from scratch. Returns the final list of names.
async fn link_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: i64,
    user_id: Uuid,
    names: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;

    let mut linked: Vec<String> = Vec::with_capacity(names.len());

    for name in names {
        let name = name.trim();
        // Blank names and in-request duplicates are dropped silently.
        if name.is_empty() || linked.iter().any(|t| t == name) {
            continue;
        }

        // Get-or-create by name. The no-op DO UPDATE makes RETURNING yield the
        // id for pre-existing rows as well.
        let tag_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tags (name, created_by)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;

        linked.push(name.to_string());
    }

    Ok(linked)
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS / AUTH ---

    /// get_user
    ///
    /// Retrieves the full user record by primary key. This backs the AuthUser
    /// extractor, so it runs on every authenticated request.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, first_name, last_name, password_hash, role, created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, first_name, last_name, password_hash, role, created_at, updated_at
               FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    /// get_user_by_username_or_email
    ///
    /// Credential lookup for signin: the single identifier field is matched
    /// against both the username and email columns.
    async fn get_user_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, first_name, last_name, password_hash, role, created_at, updated_at
               FROM users WHERE username = $1 OR email = $1"#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
    }

    async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
    }

    async fn count_users(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
    }

    /// create_user
    ///
    /// Inserts a fully-resolved user record. The unique constraints on
    /// username and email surface as database errors for the caller to map.
    async fn create_user(&self, new_user: NewUser) -> Result<User, sqlx::Error> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, first_name, last_name, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(new_id)
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.password_hash)
        .bind(new_user.role)
        .fetch_one(&self.pool)
        .await
    }

    /// update_user
    ///
    /// Uses the PostgreSQL `COALESCE` function to efficiently handle `Option<T>` fields,
    /// only updating a column if the corresponding field in `update` is `Some`.
    async fn update_user(
        &self,
        id: Uuid,
        update: UserUpdate,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, first_name, last_name, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.email)
        .bind(update.password_hash)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn set_user_role(&self, id: Uuid, role: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, first_name, last_name, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
    }

    async fn count_posts_by_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    // --- POSTS ---

    /// list_posts
    ///
    /// Newest-first page of posts with their tag names attached, plus the
    /// total row count for the pagination envelope.
    async fn list_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, category_id, title, body, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((self.attach_tags(posts).await?, total))
    }

    async fn list_posts_by_category(
        &self,
        category_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;

        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, category_id, title, body, created_at, updated_at
            FROM posts
            WHERE category_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((self.attach_tags(posts).await?, total))
    }

    async fn list_posts_by_tag(
        &self,
        tag_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_tags WHERE tag_id = $1")
                .bind(tag_id)
                .fetch_one(&self.pool)
                .await?;

        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.user_id, p.category_id, p.title, p.body, p.created_at, p.updated_at
            FROM posts p
            JOIN post_tags pt ON p.id = pt.post_id
            WHERE pt.tag_id = $1
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(tag_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((self.attach_tags(posts).await?, total))
    }

    async fn get_post(&self, id: i64) -> Result<Option<PostResponse>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, category_id, title, body, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match post {
            Some(post) => {
                let mut responses = self.attach_tags(vec![post]).await?;
                Ok(responses.pop())
            }
            None => Ok(None),
        }
    }

    /// create_post
    ///
    /// Inserts the post row and links its tags in one transaction so a tag
    /// failure never leaves a half-created post behind.
    async fn create_post(
        &self,
        user_id: Uuid,
        req: &PostRequest,
    ) -> Result<PostResponse, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, category_id, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, category_id, title, body, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(req.category_id)
        .bind(&req.title)
        .bind(&req.body)
        .fetch_one(&mut *tx)
        .await?;

        let tags = link_tags(&mut tx, post.id, user_id, &req.tags).await?;

        tx.commit().await?;

        Ok(PostResponse::from_entity(post, tags))
    }

    /// update_post
    ///
    /// Full replace of the post fields and its tag set, transactionally. Tags
    /// created along the way are attributed to the post owner.
    async fn update_post(
        &self,
        id: i64,
        req: &PostRequest,
    ) -> Result<Option<PostResponse>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let Some(post) = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2, body = $3, category_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, category_id, title, body, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.body)
        .bind(req.category_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let tags = link_tags(&mut tx, post.id, post.user_id, &req.tags).await?;

        tx.commit().await?;

        Ok(Some(PostResponse::from_entity(post, tags)))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- COMMENTS ---

    async fn list_comments(
        &self,
        post_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Comment>, i64), sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.post_id, c.user_id, c.body, u.username AS author_username,
                   c.created_at, c.updated_at
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((comments, total))
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.post_id, c.user_id, c.body, u.username AS author_username,
                   c.created_at, c.updated_at
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// create_comment
    ///
    /// Inserts a new comment and immediately joins with `users` to return the
    /// enriched `Comment` model, including the author's username.
    async fn create_comment(
        &self,
        post_id: i64,
        user_id: Uuid,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        // Uses a CTE to perform the insert and the enriching join in one query.
        sqlx::query_as::<_, Comment>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, user_id, body)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, user_id, body, created_at, updated_at
            )
            SELECT i.id, i.post_id, i.user_id, i.body, u.username AS author_username,
                   i.created_at, i.updated_at
            FROM inserted i
            JOIN users u ON i.user_id = u.id
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_comment(&self, id: i64, body: &str) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            WITH changed AS (
                UPDATE comments SET body = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING id, post_id, user_id, body, created_at, updated_at
            )
            SELECT c.id, c.post_id, c.user_id, c.body, u.username AS author_username,
                   c.created_at, c.updated_at
            FROM changed c
            JOIN users u ON c.user_id = u.id
            "#,
        )
        .bind(id)
        .bind(body)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- ALBUMS ---

    async fn list_albums(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Album>, i64), sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM albums")
            .fetch_one(&self.pool)
            .await?;

        let albums = sqlx::query_as::<_, Album>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM albums
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((albums, total))
    }

    async fn get_album(&self, id: i64) -> Result<Option<Album>, sqlx::Error> {
        sqlx::query_as::<_, Album>(
            "SELECT id, user_id, title, created_at, updated_at FROM albums WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_album(
        &self,
        user_id: Uuid,
        req: &AlbumRequest,
    ) -> Result<Album, sqlx::Error> {
        sqlx::query_as::<_, Album>(
            r#"
            INSERT INTO albums (user_id, title)
            VALUES ($1, $2)
            RETURNING id, user_id, title, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&req.title)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_album(
        &self,
        id: i64,
        req: &AlbumRequest,
    ) -> Result<Option<Album>, sqlx::Error> {
        sqlx::query_as::<_, Album>(
            r#"
            UPDATE albums SET title = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_album(&self, id: i64) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- PHOTOS ---

    async fn list_photos(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Photo>, i64), sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM photos")
            .fetch_one(&self.pool)
            .await?;

        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, album_id, title, url, thumbnail_url, created_at, updated_at
            FROM photos
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((photos, total))
    }

    async fn list_photos_by_album(
        &self,
        album_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Photo>, i64), sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM photos WHERE album_id = $1")
            .bind(album_id)
            .fetch_one(&self.pool)
            .await?;

        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, album_id, title, url, thumbnail_url, created_at, updated_at
            FROM photos
            WHERE album_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(album_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((photos, total))
    }

    async fn get_photo(&self, id: i64) -> Result<Option<Photo>, sqlx::Error> {
        sqlx::query_as::<_, Photo>(
            r#"SELECT id, album_id, title, url, thumbnail_url, created_at, updated_at
               FROM photos WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_photo(&self, req: &PhotoRequest) -> Result<Photo, sqlx::Error> {
        sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (album_id, title, url, thumbnail_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, album_id, title, url, thumbnail_url, created_at, updated_at
            "#,
        )
        .bind(req.album_id)
        .bind(&req.title)
        .bind(&req.url)
        .bind(&req.thumbnail_url)
        .fetch_one(&self.pool)
        .await
    }

    /// update_photo
    ///
    /// Full replace, including `album_id`, so a photo can be moved between
    /// albums. The handler has already authorized both the source and the
    /// target album.
    async fn update_photo(
        &self,
        id: i64,
        req: &PhotoRequest,
    ) -> Result<Option<Photo>, sqlx::Error> {
        sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photos
            SET title = $2, url = $3, thumbnail_url = $4, album_id = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, album_id, title, url, thumbnail_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.url)
        .bind(&req.thumbnail_url)
        .bind(req.album_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_photo(&self, id: i64) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- TAGS ---

    async fn list_tags(&self, limit: i64, offset: i64) -> Result<(Vec<Tag>, i64), sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await?;

        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, created_by, created_at, updated_at
            FROM tags
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((tags, total))
    }

    async fn get_tag(&self, id: i64) -> Result<Option<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT id, name, created_by, created_at, updated_at FROM tags WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_tag(&self, user_id: Uuid, name: &str) -> Result<Tag, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name, created_by)
            VALUES ($1, $2)
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_tag(&self, id: i64, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_tag(&self, id: i64) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- CATEGORIES ---

    async fn list_categories(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Category>, i64), sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_by, created_at, updated_at
            FROM categories
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((categories, total))
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, created_by, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_category(&self, user_id: Uuid, name: &str) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, created_by)
            VALUES ($1, $2)
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_category(
        &self,
        id: i64,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_category(&self, id: i64) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
