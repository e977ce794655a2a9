pub mod documents;
pub mod health;

use actix_web::web;

/// Route table, shared by the server binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/upload", web::post().to(documents::upload))
        .route(
            "/documents/department/{department}",
            web::get().to(documents::list_by_department),
        )
        .route(
            "/document/{filename}",
            web::get().to(documents::fetch_document),
        );
}
