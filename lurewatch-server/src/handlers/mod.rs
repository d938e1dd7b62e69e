pub mod campaign;
pub mod dashboard;
pub mod health;
pub mod settings;
pub mod target;
pub mod track;

pub mod error {
    use lurewatch_common::messages::ServerErrorResponse;

    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use std::fmt;

    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        IncorrectlyFormed(&'static str),
        MissingHeader(&'static str),

        // 404
        DoesNotExist(&'static str),

        // 412
        NoSenderCredentials(&'static str),

        // 500
        InternalError(&'static str),
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let server_error: ServerErrorResponse = self.into();
            write!(f, "{:?}", server_error)
        }
    }

    impl From<&HttpErrorResponse> for ServerErrorResponse {
        fn from(resp: &HttpErrorResponse) -> Self {
            match resp {
                HttpErrorResponse::IncorrectlyFormed(msg) => ServerErrorResponse {
                    err_type: String::from("INCORRECTLY_FORMED"),
                    err_message: format!("Incorrectly formed request: {msg}"),
                },
                HttpErrorResponse::MissingHeader(msg) => ServerErrorResponse {
                    err_type: String::from("MISSING_HEADER"),
                    err_message: format!("Missing header: {msg}"),
                },
                HttpErrorResponse::DoesNotExist(msg) => ServerErrorResponse {
                    err_type: String::from("DOES_NOT_EXIST"),
                    err_message: format!("Does not exist: {msg}"),
                },
                HttpErrorResponse::NoSenderCredentials(msg) => ServerErrorResponse {
                    err_type: String::from("NO_SENDER_CREDENTIALS"),
                    err_message: format!("No sender credentials: {msg}"),
                },
                HttpErrorResponse::InternalError(msg) => ServerErrorResponse {
                    err_type: String::from("INTERNAL_ERROR"),
                    err_message: format!("Internal error: {msg}"),
                },
            }
        }
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn error_response(&self) -> HttpResponse {
            HttpResponseBuilder::new(self.status_code()).json(ServerErrorResponse::from(self))
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                HttpErrorResponse::IncorrectlyFormed(_) | HttpErrorResponse::MissingHeader(_) => {
                    StatusCode::BAD_REQUEST
                }
                HttpErrorResponse::DoesNotExist(_) => StatusCode::NOT_FOUND,
                HttpErrorResponse::NoSenderCredentials(_) => StatusCode::PRECONDITION_FAILED,
                HttpErrorResponse::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use actix_web::error::ResponseError;

        #[test]
        fn test_status_codes() {
            assert_eq!(
                HttpErrorResponse::IncorrectlyFormed("x").status_code(),
                StatusCode::BAD_REQUEST
            );
            assert_eq!(
                HttpErrorResponse::MissingHeader("x").status_code(),
                StatusCode::BAD_REQUEST
            );
            assert_eq!(
                HttpErrorResponse::DoesNotExist("x").status_code(),
                StatusCode::NOT_FOUND
            );
            assert_eq!(
                HttpErrorResponse::NoSenderCredentials("x").status_code(),
                StatusCode::PRECONDITION_FAILED
            );
            assert_eq!(
                HttpErrorResponse::InternalError("x").status_code(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }

        #[test]
        fn test_error_body_carries_type_and_message() {
            let response =
                ServerErrorResponse::from(&HttpErrorResponse::NoSenderCredentials(
                    "No usable sender identity is configured",
                ));

            assert_eq!(response.err_type, "NO_SENDER_CREDENTIALS");
            assert!(response
                .err_message
                .contains("No usable sender identity is configured"));
        }
    }
}
