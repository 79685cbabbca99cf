use f1_stats_api::chrono::{Datelike, Utc};
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::serde::Serialize;
use rocket::{Request, Response};
use std::fmt::Display;
use std::time::Instant;

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn current_season() -> i32 {
    Utc::now().year()
}

pub enum ApiResponse {
    Ok {
        body: String,
        headers: Vec<(String, String)>,
    },
    InternalError(String),
    NotFound(String),
}

fn error_body(message: &str, error: Option<String>) -> String {
    let body = ErrorBody { message, error };
    rocket::serde::json::to_string(&body).unwrap_or_else(|_| format!("{{\"message\":{:?}}}", message))
}

impl ApiResponse {
    pub fn new_ok_from_string(data: String) -> Self {
        Self::Ok {
            body: data,
            headers: vec![],
        }
    }

    pub fn new_ok<T>(data: &T) -> Self
    where
        T: Serialize,
    {
        match rocket::serde::json::to_string(data) {
            Ok(json) => Self::new_ok_from_string(json),
            Err(e) => Self::new_internal_error("Failed to serialize response", e),
        }
    }

    pub fn add_header<T>(mut self, k: T, v: T) -> Self
    where
        T: ToString,
    {
        match &mut self {
            Self::Ok { headers, .. } => headers.push((k.to_string(), v.to_string())),
            _ => log::trace!("Not setting header {} on an error response", k.to_string()),
        }

        self
    }

    pub fn new_internal_error<T>(message: &str, error: T) -> Self
    where
        T: Display,
    {
        Self::InternalError(error_body(message, Some(format!("{:#}", error))))
    }

    pub fn new_not_found(message: &str) -> Self {
        Self::NotFound(error_body(message, None))
    }

    pub fn nocache(self) -> Self {
        self.add_header("X-Cached", "false")
    }

    pub fn cached(self, age: Instant) -> Self {
        self.add_header("X-Cached", "true")
            .add_header("X-Cached-Age", age.elapsed().as_secs().to_string().as_str())
    }

    pub fn cache_status(self, age: Option<Instant>) -> Self {
        match age {
            Some(age) => self.cached(age),
            None => self.nocache(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiResponse {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let (body, code) = match &self {
            Self::Ok { body, .. } => (body, Status::Ok),
            Self::InternalError(body) => (body, Status::InternalServerError),
            Self::NotFound(body) => (body, Status::NotFound),
        };

        let mut resp = Response::build_from(body.to_owned().respond_to(request)?);
        resp.status(code);
        resp.header(ContentType::JSON);

        if let Self::Ok { headers, .. } = self {
            for (k, v) in headers {
                resp.raw_header(k, v);
            }
        }

        resp.ok()
    }
}
