use actix_multipart::MultipartError;
use actix_web::{ResponseError, web::HttpResponse, http::StatusCode};
use actix_web::error::BlockingError;
use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use log::error;
use serde_json::json;

#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error: {}", _0)]
    InternalServerError(String),

    /// An internal error labelled with the operation that was running
    #[display(fmt = "{}: {}", message, details)]
    Failed {
        message: &'static str,
        details: String,
    },

    #[display(fmt = "Bad Request: {}", _0)]
    BadRequest(String),

    #[display(fmt = "{} not found", _0)]
    NotFound(String),

    #[display(fmt = "Incorrect password")]
    WrongPassword,

    #[display(fmt = "{} already registered", _0)]
    AlreadyPresent(String),
}

impl ServiceError {
    /// Labels an internal failure with the message reported to the client,
    /// client errors pass through untouched.
    pub fn during(self, message: &'static str) -> ServiceError {
        match self {
            ServiceError::InternalServerError(details) => ServiceError::Failed { message, details },
            err => err,
        }
    }
}

impl From<DBError> for ServiceError {
    fn from(error: DBError) -> ServiceError {
        match error {
            DBError::DatabaseError(kind, info) => {
                let message = info.details().unwrap_or_else(|| info.message()).to_string();
                if let DatabaseErrorKind::UniqueViolation = kind {
                    ServiceError::AlreadyPresent(message)
                } else {
                    ServiceError::InternalServerError(format!("DB error, {:?} {}", kind, message))
                }
            }
            DBError::NotFound => ServiceError::NotFound("Record".to_string()),
            err => ServiceError::InternalServerError(format!("DB error, {}", err)),
        }
    }
}

impl From<r2d2::Error> for ServiceError {
    fn from(error: r2d2::Error) -> ServiceError {
        ServiceError::InternalServerError(format!("Pool error: {}", error))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> ServiceError {
        ServiceError::InternalServerError(format!("Malformed document: {}", error))
    }
}

impl From<calamine::Error> for ServiceError {
    fn from(error: calamine::Error) -> ServiceError {
        ServiceError::InternalServerError(format!("Spreadsheet error: {}", error))
    }
}

impl From<MultipartError> for ServiceError {
    fn from(error: MultipartError) -> ServiceError {
        match error {
            MultipartError::NoContentType | MultipartError::ParseContentType | MultipartError::Boundary =>
                ServiceError::BadRequest("No file part".to_string()),
            err => ServiceError::BadRequest(format!("Malformed upload: {}", err)),
        }
    }
}

impl From<BlockingError<ServiceError>> for ServiceError {
    fn from(error: BlockingError<ServiceError>) -> ServiceError {
        match error {
            BlockingError::Error(err) => err,
            BlockingError::Canceled => ServiceError::InternalServerError("Blocking task canceled".to_string()),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InternalServerError(_) | ServiceError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::BadRequest(_) | ServiceError::AlreadyPresent(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::WrongPassword => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::InternalServerError(details) => {
                error!("{}", self);
                json!({ "error": "Internal server error", "details": details })
            },
            ServiceError::Failed { message, details } => {
                error!("{}", self);
                json!({ "error": message, "details": details })
            },
            ServiceError::BadRequest(message) => json!({ "error": message }),
            err => json!({ "error": err.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
