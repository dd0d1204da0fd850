//! Paths of the remote management API, relative to the base URL

use crate::types::RemoteId;

/// Default base URL of the management API
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Create an owner
pub const OWNERS: &str = "/propietarios";

/// Secondary owner registration, used only after a conflict
pub const OWNER_REGISTRATION: &str = "/usuarios/propietario";

/// Register a guest
pub const GUEST_REGISTRATION: &str = "/usuarios/huesped";

/// Look up a user by email (`?email=`)
pub const USER_BY_EMAIL: &str = "/usuarios/email";

/// Create a property
pub const PROPERTIES: &str = "/propiedades";

/// List locks, or get one with `/{id}`
pub const LOCKS: &str = "/cerraduras";

/// Create a lock
pub const LOCK_CREATE: &str = "/cerraduras/create";

/// Create or list tokens
pub const TOKENS: &str = "/tokens";

/// Create an access grant
pub const ACCESSES: &str = "/accesos";

/// Path of a single lock
pub fn lock_by_id(id: RemoteId) -> String {
    format!("{}/{}", LOCKS, id)
}
