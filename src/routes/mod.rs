/// Router Module Index
///
/// Organizes the routing into access-segregated modules. Access control is applied at
/// the module level (via Axum layers), so a route cannot be exposed by accident.

/// Routes accessible without any credential: health, landing, login, registration.
pub mod public;

/// JSON API for the single-page frontend. Every handler takes the `CurrentIdentity`
/// extractor and answers 401 without a credential.
pub mod authenticated;

/// The protected dashboard subtree, wrapped by the route guard middleware.
pub mod dashboard;
