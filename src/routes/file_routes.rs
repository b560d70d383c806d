// src/routes/file_routes.rs
// Public, unauthenticated surface: service banner and blob downloads.
use crate::utils::fs_utils;
use actix_web::{get, web, HttpResponse, Responder};
use std::fs;

// GET ROUTES
#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().body("Welcome to the Heimdall submission service!")
}

// Serves stored blobs under the public base URL. Submission rows and
// content rows reference these URLs.
#[get("/public/{bucket}/{path:.*}")]
async fn get_blob(path: web::Path<(String, String)>) -> impl Responder {
    let (bucket, blob_path) = path.into_inner();

    // Directory escapes are not valid blob paths
    if blob_path.split('/').any(|segment| segment == "..") {
        return HttpResponse::NotFound().body("File not found");
    }

    let file_path = fs_utils::collection_dir("blobs").join(&bucket).join(&blob_path);

    match fs::read(&file_path) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("application/octet-stream")
            .body(bytes),
        Err(_) => HttpResponse::NotFound().body("File not found"),
    }
}

// Register routes function for easy import
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(get_blob);
}
