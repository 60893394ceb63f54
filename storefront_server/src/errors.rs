use actix_web::{
    error::ResponseError,
    http::StatusCode,
    HttpResponse,
};
use log::error;
use storefront_engine::{AddressApiError, AuthApiError, CartApiError, CatalogApiError, OrderFlowError};
use thiserror::Error;

use crate::data_objects::JsonResponse;

const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred. Please try again later.";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("The service is temporarily unavailable. {0}")]
    Unavailable(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Invalid request. {0}")]
    InvalidRequest(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Conflict. {0}")]
    Conflict(String),
}

impl ServerError {
    fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
                AuthError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
                AuthError::SigningError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!("💻️ {self}");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(self.status_code()).json(JsonResponse::failure(message))
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Access token has expired.")]
    ExpiredToken,
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Could not sign access token. {0}")]
    SigningError(String),
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::RoleNotAllowed { .. } => {
                Self::AuthenticationError(AuthError::InsufficientPermissions(e.to_string()))
            },
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            CatalogApiError::Unavailable(s) => Self::Unavailable(s),
            CatalogApiError::ProductNotFound(_) => Self::NoRecordFound(e.to_string()),
            CatalogApiError::InvalidProduct(_) => Self::InvalidRequest(e.to_string()),
        }
    }
}

impl From<CartApiError> for ServerError {
    fn from(e: CartApiError) -> Self {
        match e {
            CartApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            CartApiError::Unavailable(s) => Self::Unavailable(s),
            CartApiError::ProductNotFound(_) => Self::NoRecordFound(e.to_string()),
            CartApiError::InvalidQuantity(_) => Self::InvalidRequest(e.to_string()),
        }
    }
}

impl From<AddressApiError> for ServerError {
    fn from(e: AddressApiError) -> Self {
        match e {
            AddressApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            AddressApiError::Unavailable(s) => Self::Unavailable(s),
            AddressApiError::AddressNotFound(_) => Self::NoRecordFound(e.to_string()),
            AddressApiError::AddressInUse(_) => Self::Conflict(e.to_string()),
            AddressApiError::InvalidAddress(_) => Self::InvalidRequest(e.to_string()),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            OrderFlowError::PricingError(_) => Self::InvalidRequest(e.to_string()),
            OrderFlowError::Unavailable(s) => Self::Unavailable(s),
            OrderFlowError::EmptyCart => Self::InvalidRequest(e.to_string()),
            OrderFlowError::AddressNotFound(_) | OrderFlowError::ProductNotFound(_) | OrderFlowError::OrderNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            OrderFlowError::OutOfStock { .. } |
            OrderFlowError::CartChanged |
            OrderFlowError::InvalidStatusTransition { .. } => Self::Conflict(e.to_string()),
        }
    }
}
