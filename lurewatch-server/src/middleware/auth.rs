use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future;
use uuid::Uuid;

use crate::handlers::error::HttpErrorResponse;

pub const USER_ID_HEADER: &str = "UserId";

/// The identity collaborator in front of this service owns login and session
/// verification. By the time a request reaches the engine the `UserId` header
/// carries a vetted, opaque id; it is only parsed here, never authenticated.
#[derive(Debug)]
pub struct AuthorizedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthorizedUser {
    type Error = HttpErrorResponse;
    type Future = future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(header) = req.headers().get(USER_ID_HEADER) else {
            return future::err(HttpErrorResponse::MissingHeader("UserId"));
        };

        let Ok(header) = header.to_str() else {
            return future::err(HttpErrorResponse::IncorrectlyFormed(
                "UserId header must be valid UTF-8",
            ));
        };

        match Uuid::parse_str(header) {
            Ok(user_id) => future::ok(AuthorizedUser { user_id }),
            Err(_) => future::err(HttpErrorResponse::IncorrectlyFormed(
                "UserId header must be a UUID",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_user_id_from_header() {
        let user_id = Uuid::now_v7();

        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, user_id.to_string()))
            .to_http_request();

        let user = AuthorizedUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();

        assert_eq!(user.user_id, user_id);
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected() {
        let req = TestRequest::default().to_http_request();

        assert!(AuthorizedUser::from_request(&req, &mut Payload::None)
            .await
            .is_err());
    }

    #[actix_web::test]
    async fn test_malformed_header_is_rejected() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();

        assert!(AuthorizedUser::from_request(&req, &mut Payload::None)
            .await
            .is_err());
    }
}
