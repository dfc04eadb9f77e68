use actix_web::{HttpRequest, HttpResponse, Resource, error, web};
use actix_web::http::{Method, header};

use crate::web::account_service::{login, signup};
use crate::web::chart_service::{add_chart_data, delete_chart_data, list_chart_data, update_chart_data};
use crate::web::errors::ServiceError;
use crate::web::excel_service::{fetch_excel_data, update_excel_data, upload_excel};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

pub async fn home() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Riverguard server is working!")
}

/// Empty 204 answer to a CORS preflight, the origin headers are added by the
/// cors middleware.
pub async fn preflight(req: HttpRequest) -> HttpResponse {
    let requested_headers = req.headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .and_then(|x| x.to_str().ok())
        .unwrap_or("Content-Type")
        .to_string();

    HttpResponse::NoContent()
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, requested_headers)
        .header(header::ACCESS_CONTROL_MAX_AGE, "3600")
        .finish()
}

/// Json extractor settings, malformed bodies are answered like every other
/// client error.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
            ServiceError::BadRequest(format!("Invalid JSON body: {}", err)).into()
        })
}

fn resource(path: &str) -> Resource {
    web::resource(path).route(web::method(Method::OPTIONS).to(preflight))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::resource("/").route(web::get().to(home)))
        .service(resource("/signup").route(web::post().to(signup)))
        .service(resource("/login").route(web::post().to(login)))
        .service(resource("/upload-excel").route(web::post().to(upload_excel)))
        .service(resource("/fetch-excel-data").route(web::get().to(fetch_excel_data)))
        .service(resource("/update-excel-data/{id}").route(web::put().to(update_excel_data)))
        .service(
            resource("/chart-data")
                .route(web::get().to(list_chart_data))
                .route(web::post().to(add_chart_data))
        )
        .service(
            resource("/chart-data/{id}")
                .route(web::put().to(update_chart_data))
                .route(web::delete().to(delete_chart_data))
        );
}
