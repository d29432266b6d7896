// Shared test scaffolding. Not every test binary touches every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use blog_api::{
    AppConfig, AppState,
    auth::AuthUser,
    models::{
        Album, AlbumRequest, Category, Comment, NewUser, Photo, PhotoRequest, PostRequest,
        PostResponse, SignUpRequest, Tag, User, UserUpdate,
    },
    repository::Repository,
};
use chrono::Utc;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI64, Ordering},
};
use uuid::Uuid;

// --- MOCK REPOSITORY ---

/// In-memory stand-in for the Postgres repository. Rows live in mutexed vecs
/// so handler tests can run full flows without a database and inspect what
/// was written afterwards. Referential integrity is not enforced; tests seed
/// exactly what they read.
pub struct MockRepo {
    pub users: Mutex<Vec<User>>,
    pub posts: Mutex<Vec<PostResponse>>,
    pub comments: Mutex<Vec<Comment>>,
    pub albums: Mutex<Vec<Album>>,
    pub photos: Mutex<Vec<Photo>>,
    pub tags: Mutex<Vec<Tag>>,
    pub categories: Mutex<Vec<Category>>,
    next_id: AtomicI64,
}

impl Default for MockRepo {
    fn default() -> Self {
        MockRepo {
            users: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
            albums: Mutex::new(Vec::new()),
            photos: Mutex::new(Vec::new()),
            tags: Mutex::new(Vec::new()),
            categories: Mutex::new(Vec::new()),
            // Generated ids start well clear of hand-seeded fixture ids.
            next_id: AtomicI64::new(1000),
        }
    }
}

impl MockRepo {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    // Seeding helpers used by tests to arrange preconditions.
    pub fn seed_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
    pub fn seed_post(&self, post: PostResponse) {
        self.posts.lock().unwrap().push(post);
    }
    pub fn seed_comment(&self, comment: Comment) {
        self.comments.lock().unwrap().push(comment);
    }
    pub fn seed_album(&self, album: Album) {
        self.albums.lock().unwrap().push(album);
    }
    pub fn seed_photo(&self, photo: Photo) {
        self.photos.lock().unwrap().push(photo);
    }
    pub fn seed_tag(&self, tag: Tag) {
        self.tags.lock().unwrap().push(tag);
    }
    pub fn seed_category(&self, category: Category) {
        self.categories.lock().unwrap().push(category);
    }

    /// Mirrors the tag linking the real repository does on post writes:
    /// trims names, drops blanks and duplicates, creates missing tags, and
    /// returns the resolved set in alphabetical order.
    fn resolve_tags(&self, user_id: Uuid, names: &[String]) -> Vec<String> {
        let mut tags = self.tags.lock().unwrap();
        let mut resolved: Vec<String> = Vec::new();

        for raw in names {
            let name = raw.trim();
            if name.is_empty() || resolved.iter().any(|n| n == name) {
                continue;
            }
            if !tags.iter().any(|t| t.name == name) {
                tags.push(Tag {
                    id: self.next_id(),
                    name: name.to_string(),
                    created_by: user_id,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                });
            }
            resolved.push(name.to_string());
        }

        resolved.sort();
        resolved
    }
}

/// Applies limit/offset to an already filtered and sorted set, returning the
/// page slice and the unfiltered total, like the SQL queries do.
fn page_of<T>(items: Vec<T>, limit: i64, offset: i64) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let slice = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    (slice, total)
}

#[async_trait]
impl Repository for MockRepo {
    // --- Users / Auth ---

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn count_users(&self) -> Result<i64, sqlx::Error> {
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, sqlx::Error> {
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        id: Uuid,
        update: UserUpdate,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn set_user_role(&self, id: Uuid, role: &str) -> Result<Option<User>, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.role = role.to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn count_posts_by_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .count() as i64)
    }

    // --- Posts ---

    async fn list_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error> {
        let mut posts: Vec<PostResponse> = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(page_of(posts, limit, offset))
    }

    async fn list_posts_by_category(
        &self,
        category_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error> {
        let mut posts: Vec<PostResponse> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(page_of(posts, limit, offset))
    }

    async fn list_posts_by_tag(
        &self,
        tag_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), sqlx::Error> {
        let tag_name = self
            .tags
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == tag_id)
            .map(|t| t.name.clone());
        let mut posts: Vec<PostResponse> = match tag_name {
            Some(name) => self
                .posts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.tags.contains(&name))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(page_of(posts, limit, offset))
    }

    async fn get_post(&self, id: i64) -> Result<Option<PostResponse>, sqlx::Error> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn create_post(
        &self,
        user_id: Uuid,
        req: &PostRequest,
    ) -> Result<PostResponse, sqlx::Error> {
        let tags = self.resolve_tags(user_id, &req.tags);
        let post = PostResponse {
            id: self.next_id(),
            user_id,
            category_id: req.category_id,
            title: req.title.clone(),
            body: req.body.clone(),
            tags,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: i64,
        req: &PostRequest,
    ) -> Result<Option<PostResponse>, sqlx::Error> {
        let owner = {
            let posts = self.posts.lock().unwrap();
            match posts.iter().find(|p| p.id == id) {
                Some(post) => post.user_id,
                None => return Ok(None),
            }
        };
        let tags = self.resolve_tags(owner, &req.tags);

        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.title = req.title.clone();
        post.body = req.body.clone();
        post.category_id = req.category_id;
        post.tags = tags;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() < before)
    }

    // --- Comments ---

    async fn list_comments(
        &self,
        post_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Comment>, i64), sqlx::Error> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(page_of(comments, limit, offset))
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, sqlx::Error> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_comment(
        &self,
        post_id: i64,
        user_id: Uuid,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        let author_username = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone());
        let comment = Comment {
            id: self.next_id(),
            post_id,
            user_id,
            body: body.to_string(),
            author_username,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, id: i64, body: &str) -> Result<Option<Comment>, sqlx::Error> {
        let mut comments = self.comments.lock().unwrap();
        let Some(comment) = comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.body = body.to_string();
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(comments.len() < before)
    }

    // --- Albums ---

    async fn list_albums(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Album>, i64), sqlx::Error> {
        let mut albums: Vec<Album> = self.albums.lock().unwrap().clone();
        albums.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(page_of(albums, limit, offset))
    }

    async fn get_album(&self, id: i64) -> Result<Option<Album>, sqlx::Error> {
        Ok(self.albums.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn create_album(&self, user_id: Uuid, req: &AlbumRequest) -> Result<Album, sqlx::Error> {
        let album = Album {
            id: self.next_id(),
            user_id,
            title: req.title.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.albums.lock().unwrap().push(album.clone());
        Ok(album)
    }

    async fn update_album(&self, id: i64, req: &AlbumRequest) -> Result<Option<Album>, sqlx::Error> {
        let mut albums = self.albums.lock().unwrap();
        let Some(album) = albums.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        album.title = req.title.clone();
        album.updated_at = Utc::now();
        Ok(Some(album.clone()))
    }

    async fn delete_album(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut albums = self.albums.lock().unwrap();
        let before = albums.len();
        albums.retain(|a| a.id != id);
        Ok(albums.len() < before)
    }

    // --- Photos ---

    async fn list_photos(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Photo>, i64), sqlx::Error> {
        let mut photos: Vec<Photo> = self.photos.lock().unwrap().clone();
        photos.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(page_of(photos, limit, offset))
    }

    async fn list_photos_by_album(
        &self,
        album_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Photo>, i64), sqlx::Error> {
        let mut photos: Vec<Photo> = self
            .photos
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.album_id == album_id)
            .cloned()
            .collect();
        photos.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(page_of(photos, limit, offset))
    }

    async fn get_photo(&self, id: i64) -> Result<Option<Photo>, sqlx::Error> {
        Ok(self.photos.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn create_photo(&self, req: &PhotoRequest) -> Result<Photo, sqlx::Error> {
        let photo = Photo {
            id: self.next_id(),
            album_id: req.album_id,
            title: req.title.clone(),
            url: req.url.clone(),
            thumbnail_url: req.thumbnail_url.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.photos.lock().unwrap().push(photo.clone());
        Ok(photo)
    }

    async fn update_photo(
        &self,
        id: i64,
        req: &PhotoRequest,
    ) -> Result<Option<Photo>, sqlx::Error> {
        let mut photos = self.photos.lock().unwrap();
        let Some(photo) = photos.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        photo.title = req.title.clone();
        photo.url = req.url.clone();
        photo.thumbnail_url = req.thumbnail_url.clone();
        photo.album_id = req.album_id;
        photo.updated_at = Utc::now();
        Ok(Some(photo.clone()))
    }

    async fn delete_photo(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut photos = self.photos.lock().unwrap();
        let before = photos.len();
        photos.retain(|p| p.id != id);
        Ok(photos.len() < before)
    }

    // --- Tags ---

    async fn list_tags(&self, limit: i64, offset: i64) -> Result<(Vec<Tag>, i64), sqlx::Error> {
        let mut tags: Vec<Tag> = self.tags.lock().unwrap().clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page_of(tags, limit, offset))
    }

    async fn get_tag(&self, id: i64) -> Result<Option<Tag>, sqlx::Error> {
        Ok(self.tags.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn create_tag(&self, user_id: Uuid, name: &str) -> Result<Tag, sqlx::Error> {
        let tag = Tag {
            id: self.next_id(),
            name: name.to_string(),
            created_by: user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tags.lock().unwrap().push(tag.clone());
        Ok(tag)
    }

    async fn update_tag(&self, id: i64, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let mut tags = self.tags.lock().unwrap();
        let Some(tag) = tags.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        tag.name = name.to_string();
        tag.updated_at = Utc::now();
        Ok(Some(tag.clone()))
    }

    async fn delete_tag(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut tags = self.tags.lock().unwrap();
        let before = tags.len();
        tags.retain(|t| t.id != id);
        Ok(tags.len() < before)
    }

    // --- Categories ---

    async fn list_categories(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Category>, i64), sqlx::Error> {
        let mut categories: Vec<Category> = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page_of(categories, limit, offset))
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, sqlx::Error> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_category(&self, user_id: Uuid, name: &str) -> Result<Category, sqlx::Error> {
        let category = Category {
            id: self.next_id(),
            name: name.to_string(),
            created_by: user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.categories.lock().unwrap().push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: i64, name: &str) -> Result<Option<Category>, sqlx::Error> {
        let mut categories = self.categories.lock().unwrap();
        let Some(category) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = name.to_string();
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() < before)
    }
}

// --- FIXTURES ---

pub const OWNER_ID: Uuid = Uuid::from_u128(1);
pub const OTHER_ID: Uuid = Uuid::from_u128(2);
pub const ADMIN_ID: Uuid = Uuid::from_u128(3);

pub fn user_fixture(id: Uuid, username: &str, role: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password_hash: String::new(),
        role: role.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn post_fixture(id: i64, user_id: Uuid, category_id: i64) -> PostResponse {
    PostResponse {
        id,
        user_id,
        category_id,
        title: "An adequately long title".to_string(),
        body: "A body that is comfortably longer than the fifty character minimum.".to_string(),
        tags: Vec::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn comment_fixture(id: i64, post_id: i64, user_id: Uuid) -> Comment {
    Comment {
        id,
        post_id,
        user_id,
        body: "A comment of sufficient length".to_string(),
        author_username: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn album_fixture(id: i64, user_id: Uuid) -> Album {
    Album {
        id,
        user_id,
        title: "Holiday shots".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn photo_fixture(id: i64, album_id: i64) -> Photo {
    Photo {
        id,
        album_id,
        title: "Sunset".to_string(),
        url: "https://example.com/sunset.jpg".to_string(),
        thumbnail_url: "https://example.com/sunset-thumb.jpg".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn tag_fixture(id: i64, created_by: Uuid, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
        created_by,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn category_fixture(id: i64, created_by: Uuid, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        created_by,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// --- REQUEST BUILDERS ---

pub fn post_request(category_id: i64) -> PostRequest {
    PostRequest {
        title: "Ten characters or more".to_string(),
        body: "This body comfortably clears the fifty character minimum required for posts."
            .to_string(),
        category_id,
        tags: Vec::new(),
    }
}

pub fn signup_request(username: &str) -> SignUpRequest {
    SignUpRequest {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "password123".to_string(),
    }
}

// --- STATE AND CALLER HELPERS ---

/// Builds an AppState around the mock; keep a second Arc to the mock when the
/// test needs to inspect the stores afterwards.
pub fn test_state(repo: Arc<MockRepo>) -> AppState {
    AppState {
        repo,
        config: AppConfig::default(),
    }
}

pub fn as_user(id: Uuid) -> AuthUser {
    AuthUser {
        id,
        role: "user".to_string(),
    }
}

pub fn as_admin(id: Uuid) -> AuthUser {
    AuthUser {
        id,
        role: "admin".to_string(),
    }
}
