//! Request handlers, one module per API resource.
//!
//! Authorization policy is enforced here, not in the repository: mutating
//! handlers fetch the target first (404 when absent), then compare the owner
//! against the authenticated caller (403 unless owner or admin), and only then
//! touch the database. Reads are public.

pub mod albums;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod photos;
pub mod posts;
pub mod tags;
pub mod users;
