use crate::{
    AppState,
    api::models::profiles::CurrentUser,
    errors::{Error, Result},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Extract the caller from the trusted proxy header.
/// Returns:
/// - None: No proxy header present
/// - Some(Ok(user)): Header present and it names an active profile
/// - Some(Err(error)): Header present but unreadable, unknown, inactive, or the lookup failed
#[instrument(skip(parts, state))]
async fn try_proxy_header_auth(parts: &Parts, state: &AppState) -> Option<Result<CurrentUser>> {
    let header = parts.headers.get(&state.config.auth.proxy_header.header_name)?;

    let email = match header.to_str() {
        Ok(s) if !s.trim().is_empty() => s.trim(),
        Ok(_) => {
            return Some(Err(Error::Unauthenticated {
                message: Some("Empty identity header".to_string()),
            }));
        }
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid identity header: {e}"),
            }));
        }
    };

    match state.backend.get_profile_by_email(email).await {
        Ok(Some(profile)) if profile.active => Some(Ok(CurrentUser::from(profile))),
        Ok(Some(_)) => Some(Err(Error::Unauthenticated {
            message: Some("Profile is inactive".to_string()),
        })),
        Ok(None) => Some(Err(Error::Unauthenticated { message: None })),
        Err(e) => Some(Err(Error::Database(e))),
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        if !state.config.auth.proxy_header.enabled {
            return Err(Error::Unauthenticated { message: None });
        }

        match try_proxy_header_auth(parts, state).await {
            Some(Ok(user)) => {
                debug!("Found proxy header authenticated user: {}", user.id);
                Ok(user)
            }
            Some(Err(e)) => {
                trace!("Proxy header authentication failed: {:?}", e);
                // Lookup failures surface as-is so they are logged at the right level
                match e {
                    Error::Database(_) | Error::BadRequest { .. } => Err(e),
                    _ => Err(Error::Unauthenticated { message: None }),
                }
            }
            None => {
                trace!("No authentication credentials found in request");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::profiles::{CurrentUser, Role},
        errors::Error,
        test_utils::{MemoryBackend, create_test_state, sample_profile},
    };
    use axum::{extract::FromRequestParts as _, http::request::Parts};
    use std::sync::Arc;

    fn create_test_parts_with_header(header_name: &str, header_value: &str) -> Parts {
        let request = axum::http::Request::builder()
            .uri("http://localhost/test")
            .header(header_name, header_value)
            .body(())
            .unwrap();

        let (parts, _body) = request.into_parts();
        parts
    }

    #[tokio::test]
    async fn test_existing_profile_extraction() {
        let backend = Arc::new(MemoryBackend::default());
        let profile = backend.insert_profile(sample_profile("Paula", Role::Pastor));
        let state = create_test_state(backend);

        let mut parts = create_test_parts_with_header("x-cellctl-user", &profile.email);
        let current_user = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap();

        assert_eq!(current_user.id, profile.id);
        assert_eq!(current_user.role, Role::Pastor);
    }

    #[tokio::test]
    async fn test_unknown_profile_is_rejected() {
        let state = create_test_state(Arc::new(MemoryBackend::default()));

        let mut parts = create_test_parts_with_header("x-cellctl-user", "stranger@church.test");
        let result = CurrentUser::from_request_parts(&mut parts, &state).await;

        assert!(matches!(result, Err(Error::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_inactive_profile_is_rejected() {
        let backend = Arc::new(MemoryBackend::default());
        let mut inactive = sample_profile("Former", Role::Admin);
        inactive.active = false;
        let inactive = backend.insert_profile(inactive);
        let state = create_test_state(backend);

        let mut parts = create_test_parts_with_header("x-cellctl-user", &inactive.email);
        let result = CurrentUser::from_request_parts(&mut parts, &state).await;

        assert!(matches!(result, Err(Error::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let state = create_test_state(Arc::new(MemoryBackend::default()));

        let mut parts = create_test_parts_with_header("x-other", "someone@church.test");
        let result = CurrentUser::from_request_parts(&mut parts, &state).await;

        assert!(matches!(result, Err(Error::Unauthenticated { message: None })));
    }
}
