/// Router Module Index
///
/// Splits the routes by how the role gate treats them. The gate itself is a
/// single layer over the merged router (see `create_router`), so these modules
/// only declare paths and handlers.

/// Landing and `/auth` pages. Logged-in callers are redirected away from `/auth`.
pub mod public;

/// `/dashboard/{role}` pages. Reached only with a matching role and the
/// authentication flag.
pub mod dashboard;

/// JSON API under `/api`. Excluded from the gate.
pub mod api;
