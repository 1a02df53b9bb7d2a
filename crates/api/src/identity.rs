//! Requester identity extraction from request headers.
//!
//! Authentication mechanics are out of scope; upstream infrastructure is
//! trusted to have verified the caller and to forward `x-user-id` and
//! `x-user-role`. A missing `x-user-id` yields `None` and the service
//! layer decides whether the operation requires authentication.

use axum::http::HeaderMap;
use common::{Identity, Role, UserId};

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extracts the requester identity from headers.
///
/// A malformed header is a client error, not an anonymous request:
/// an unparseable id or unknown role yields 400 rather than `None`.
pub fn from_headers(headers: &HeaderMap) -> Result<Option<Identity>, ApiError> {
    let Some(raw_id) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    let raw_id = raw_id
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {USER_ID_HEADER} header")))?;
    let user_id = uuid::Uuid::parse_str(raw_id)
        .map(UserId::from_uuid)
        .map_err(|e| ApiError::BadRequest(format!("Invalid {USER_ID_HEADER}: {e}")))?;

    let role = match headers.get(USER_ROLE_HEADER) {
        Some(raw_role) => {
            let raw_role = raw_role
                .to_str()
                .map_err(|_| ApiError::BadRequest(format!("Invalid {USER_ROLE_HEADER} header")))?;
            Role::parse(raw_role).ok_or_else(|| {
                ApiError::BadRequest(format!("Unknown role: {raw_role}"))
            })?
        }
        None => Role::default(),
    };

    Ok(Some(Identity::new(user_id, role)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_user_id_is_anonymous() {
        let headers = HeaderMap::new();
        assert!(from_headers(&headers).unwrap().is_none());
    }

    #[test]
    fn user_id_without_role_defaults_to_customer() {
        let mut headers = HeaderMap::new();
        let user_id = UserId::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&user_id.to_string()).unwrap(),
        );

        let identity = from_headers(&headers).unwrap().unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::Customer);
    }

    #[test]
    fn role_header_is_parsed_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&UserId::new().to_string()).unwrap(),
        );
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("ADMIN"));

        let identity = from_headers(&headers).unwrap().unwrap();
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn malformed_user_id_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(
            from_headers(&headers),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&UserId::new().to_string()).unwrap(),
        );
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("superuser"));
        assert!(matches!(
            from_headers(&headers),
            Err(ApiError::BadRequest(_))
        ));
    }
}
