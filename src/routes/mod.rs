/// Router Module Index
///
/// Splits the route table into one module per trust level so that access
/// control is visible at the router layer itself rather than buried in
/// individual handlers. A route added to the wrong module fails loudly in
/// review instead of silently shipping unprotected.
///
/// The three modules map directly to the platform's access levels.

/// Routes open to any client: the whole read surface plus the signup and
/// signin gateway.
pub mod public;

/// Routes behind the `AuthUser` middleware. Every content mutation lives here.
pub mod authenticated;

/// Routes for users with the 'admin' role: account provisioning and role
/// management. The admin check runs inside each handler.
pub mod admin;
