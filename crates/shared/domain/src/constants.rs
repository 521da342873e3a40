//! Domain-level constants.
//!
//! Collection names, wire values and push delivery limits.

// =============================================================================
// Collections
// =============================================================================

/// Default schema holding registered users
pub const DEFAULT_USERS_SCHEMA: &str = "auth";

/// Default collection listing registered users
pub const DEFAULT_USERS_TABLE: &str = "users";

// =============================================================================
// Fan-out
// =============================================================================

/// Status reported for a completed fan-out
pub const STATUS_SENT: &str = "sent";

// =============================================================================
// Push delivery
// =============================================================================

/// Number of trailing token characters that may appear in logs and responses
pub const TOKEN_VISIBLE_SUFFIX: usize = 10;

/// OAuth scope required by the FCM HTTP v1 API
pub const FCM_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Default Google OAuth2 token endpoint
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Base URL of the FCM HTTP v1 API
pub const FCM_API_BASE_URL: &str = "https://fcm.googleapis.com/v1";

/// Lifetime requested for the signed service account assertion
pub const ASSERTION_LIFETIME_SECONDS: i64 = 3600;

/// Grant type for exchanging a signed assertion for an access token
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

// =============================================================================
// Authentication
// =============================================================================

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
