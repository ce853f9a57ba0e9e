/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// enforcing the auth gate explicitly at the module level (via Axum layers)
/// so no mutating endpoint can be exposed by accident.

/// Routes accessible to all clients (anonymous, read-only) plus login.
pub mod public;

/// Mutating routes protected by the `AuthUser` extractor middleware.
/// Requires a validated admin bearer token.
pub mod protected;
