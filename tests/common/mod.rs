#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_http::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::test;
use rand::Rng;
use rust_xlsxwriter::Workbook;
use serde_json::Value;

use riverguard_server::*;
use riverguard_server::documents::{MemoryUserCollection, PgUserCollection};

lazy_static! {
    static ref MIGRATION_SETUP: Mutex<()> = Mutex::new(());
}

pub const UPLOAD_LIMIT: usize = 1024 * 1024;
pub const BOUNDARY: &str = "riverguard-test-boundary";

/// Builds the full application around `data`, the same way `main` does.
macro_rules! init_app {
    ($data:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .data($data)
                .wrap(actix_cors::Cors::new().send_wildcard().disable_preflight().finish())
                .app_data(riverguard_server::api_service::json_config(4096))
                .configure(riverguard_server::api_service::config)
        ).await
    };
}

/// Database-backed application data, returns from the test when no database
/// is configured.
macro_rules! database_or_skip {
    () => {
        match database_app_data() {
            Some(data) => data,
            None => {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

/// Application data that never touches the database: users live in memory
/// and the pool only connects on demand.
pub fn memory_app_data() -> (AppData, Arc<MemoryUserCollection>) {
    let users = Arc::new(MemoryUserCollection::default());
    let pool = lazy_pool("postgres://riverguard@localhost:1/unused", 1);
    (AppData::with_users(pool, users.clone(), UPLOAD_LIMIT), users)
}

/// Application data backed by `TEST_DATABASE_URL`, `None` when it is not set.
/// Under CI a missing database fails the test instead.
pub fn database_app_data() -> Option<AppData> {
    dotenv::dotenv().ok();
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) if std::env::var_os("CI").is_some() => panic!("TEST_DATABASE_URL is required when CI is set"),
        Err(_) => return None,
    };
    let pool = build_pool(&database_url, 4).expect("Cannot connect to TEST_DATABASE_URL");
    let data = AppData::with_users(pool.clone(), Arc::new(PgUserCollection::new(pool)), UPLOAD_LIMIT);

    {
        let _guard = MIGRATION_SETUP.lock().unwrap();
        data.setup_migrations().unwrap();
    }
    Some(data)
}

pub fn random_marker() -> String {
    let data = rand::thread_rng().gen::<[u8; 8]>();
    hex::encode(&data)
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request {
    test::TestRequest::with_uri(uri)
        .method(method)
        .set_json(&body)
        .to_request()
}

pub fn get_request(uri: &str) -> Request {
    test::TestRequest::get().uri(uri).to_request()
}

pub fn multipart_request(field: &str, filename: Option<&str>, content: &[u8]) -> Request {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    test::TestRequest::post()
        .uri("/upload-excel")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .set_payload(body)
        .to_request()
}

/// An xlsx file with `rows` on its first sheet, the first row is the header.
pub fn workbook(rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *cell).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Sends the request and parses the answer, empty bodies become `Null`.
pub async fn send<S, B>(app: &mut S, req: Request) -> (StatusCode, Value)
    where S: Service<Request = Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
          B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, value)
}
