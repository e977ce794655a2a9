use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use docstore::config::Config;
use docstore::db::Db;
use docstore::{routes, storage};
use env_logger::Env;
use std::path::Path;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Init logger to show info by default, but can be overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cfg = Config::load();

    storage::ensure_upload_dir(Path::new(&cfg.uploads_dir)).expect("create uploads dir");
    let db = Db::connect_and_migrate(&cfg.database_path)
        .await
        .expect("database init failed");

    log::info!("Starting server at {}", cfg.listen);

    let listen_addr = cfg.listen.clone();
    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(Data::new(cfg.clone()))
            .app_data(Data::new(db.clone()))
            .configure(routes::configure)
    })
    .bind(listen_addr)?
    .run()
    .await
}
