// Third-party dependencies
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use heimdall_service::routes::{dashboard_routes, file_routes, submission_routes, team_routes};
use heimdall_service::utils::config::CONFIG;
use heimdall_service::utils::{fs_utils, Authentication};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    // Collection and blob directories must exist before the first query
    fs_utils::ensure_storage_layout()?;

    let address = CONFIG.server_address.clone();
    info!("🚀 Server started at {}", address);

    HttpServer::new(|| {
        App::new()
            .wrap(Cors::permissive())
            // Attachments arrive base64-encoded inside JSON bodies, so the
            // default payload limit is far too small
            .app_data(web::JsonConfig::default().limit(32 * 1024 * 1024))
            // Public surface: banner and blob downloads
            .configure(file_routes::init_routes)
            // Everything else requires a verified session token
            .service(
                web::scope("")
                    .wrap(Authentication)
                    .configure(team_routes::init_routes)
                    .configure(dashboard_routes::init_routes)
                    .configure(submission_routes::init_routes),
            )
    })
        .bind(&address)?
        .run()
        .await
}
