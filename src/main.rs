use std::io;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware};
use log::info;

use riverguard_server::*;
use riverguard_server::config::Settings;

fn startup_error<E: std::fmt::Display>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_rt::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env();

    // create db connection pool
    let data = AppData::new(&settings).map_err(startup_error)?;
    data.setup_migrations().map_err(startup_error)?;

    let json_limit = settings.json_limit;
    info!("Listening on {}", settings.bind_address);

    HttpServer::new(move || {
        App::new()
            .data(data.clone())
            .wrap(Cors::new().send_wildcard().disable_preflight().finish())
            // enable logger
            .wrap(middleware::Logger::default())
            // limit the maximum amount of data that server will accept
            .app_data(api_service::json_config(json_limit))
            .configure(api_service::config)
    })
        .bind(settings.bind_address.as_str())?
        .run()
        .await
}
