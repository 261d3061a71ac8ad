use gotham::helpers::http::response::create_response;
use gotham::state::State;
use hyper::{Body, Response, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid catalog: {0}")]
    Catalog(String),
    #[error("Static file not found: {0}")]
    StaticNotFound(String),
    #[error("Error reading request body")]
    RequestBody(#[from] hyper::Error),
    #[error("Error rendering page")]
    Render(#[from] std::io::Error),
    #[error("Error serializing event data")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn as_response(&self, state: &State) -> Response<Body> {
        create_response(
            state,
            self.status_code(),
            mime::TEXT_PLAIN_UTF_8,
            format!("Error: {}", self),
        )
    }

    pub fn status_code(&self) -> StatusCode {
        use Error::*;
        match self {
            StaticNotFound(..) => StatusCode::NOT_FOUND,
            RequestBody(..) => StatusCode::BAD_REQUEST,
            Config(..) | Catalog(..) | Render(..) | Json(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
