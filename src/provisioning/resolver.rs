//! Identity resolution after a create conflict
//!
//! When the API answers 409 to a create, the account already exists. The resolver finds
//! its id by email, and for owners it may fall back to one secondary registration call.

use crate::api::{endpoints, ApiClient, UserPayload};
use crate::types::{RemoteId, Resolution};
use tracing::{debug, info, warn};

/// Secondary registration endpoint tried once when the email lookup fails
#[derive(Debug, Clone, Copy)]
pub struct Registration<'a> {
    /// Endpoint path
    pub path: &'a str,
    /// Body to register with
    pub payload: &'a UserPayload,
}

/// Identity found for a natural key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Id of the existing account
    pub id: RemoteId,
    /// How it was found
    pub resolution: Resolution,
}

/// Looks up existing accounts by email
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver<'a> {
    client: &'a ApiClient,
}

impl<'a> IdentityResolver<'a> {
    /// Create a resolver over `client`
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Find an account id by email via `GET /usuarios/email`
    pub fn resolve_by_email(&self, email: &str) -> Option<RemoteId> {
        let response = self.client.get(endpoints::USER_BY_EMAIL, &[("email", email)]);
        if !response.ok {
            debug!(email, status = response.status_code, "Email lookup found nothing");
            return None;
        }
        let id = RemoteId::from_body(&response.body);
        if id.is_none() {
            warn!(email, body = %response.raw, "Email lookup returned no id");
        }
        id
    }

    /// Resolve an existing identity: lookup first, then the registration path once
    pub fn resolve(&self, email: &str, registration: Option<Registration<'_>>) -> Option<ResolvedIdentity> {
        if let Some(id) = self.resolve_by_email(email) {
            info!(email, %id, "Resolved existing account by email");
            return Some(ResolvedIdentity { id, resolution: Resolution::Existing });
        }

        let registration = registration?;
        let response = self.client.create(registration.path, registration.payload);
        if !response.ok {
            warn!(
                email,
                path = registration.path,
                status = response.status_code,
                "Secondary registration failed"
            );
            return None;
        }
        let id = RemoteId::from_body(&response.body)?;
        info!(email, %id, path = registration.path, "Registered account through secondary path");
        Some(ResolvedIdentity { id, resolution: Resolution::Registered })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::HttpMethod;

    fn payload() -> UserPayload {
        UserPayload {
            name: "Carlos Ruiz".to_string(),
            email: "carlos@email.com".to_string(),
            phone: "600111222".to_string(),
            credential: "abc123".to_string(),
        }
    }

    #[test]
    fn test_resolve_by_email_sends_query() {
        let transport = ScriptedTransport::new();
        transport.reply(HttpMethod::Get, endpoints::USER_BY_EMAIL, 200, r#"{"id": 1}"#);
        let handle = transport.clone();
        let client = ApiClient::new("http://api.test", Box::new(transport));

        let resolver = IdentityResolver::new(&client);
        assert_eq!(resolver.resolve_by_email("carlos@email.com"), Some(RemoteId(1)));

        let requests = handle.requests_to(HttpMethod::Get, endpoints::USER_BY_EMAIL);
        assert_eq!(requests[0].query, vec![("email".to_string(), "carlos@email.com".to_string())]);
    }

    #[test]
    fn test_registration_fallback_after_failed_lookup() {
        let transport = ScriptedTransport::new();
        transport
            .reply(HttpMethod::Get, endpoints::USER_BY_EMAIL, 404, "")
            .reply(HttpMethod::Post, endpoints::OWNER_REGISTRATION, 200, r#"{"id": 5}"#);
        let client = ApiClient::new("http://api.test", Box::new(transport));
        let payload = payload();

        let resolved = IdentityResolver::new(&client)
            .resolve(
                "carlos@email.com",
                Some(Registration { path: endpoints::OWNER_REGISTRATION, payload: &payload }),
            )
            .unwrap();
        assert_eq!(resolved.id, RemoteId(5));
        assert_eq!(resolved.resolution, Resolution::Registered);
    }

    #[test]
    fn test_no_registration_path_gives_none() {
        let transport = ScriptedTransport::new();
        transport.reply(HttpMethod::Get, endpoints::USER_BY_EMAIL, 404, "");
        let handle = transport.clone();
        let client = ApiClient::new("http://api.test", Box::new(transport));

        assert_eq!(IdentityResolver::new(&client).resolve("ana@email.com", None), None);
        assert_eq!(handle.request_count(), 1);
    }
}
