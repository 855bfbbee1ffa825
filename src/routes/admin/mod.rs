pub mod feedback;
pub mod vendors;

use actix_web::web;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::role_auth::RequireRole;
use crate::models::account::AccountRole;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(RequireRole::new(AccountRole::Admin))
            .wrap(AuthMiddleware)
            .route("/vendors", web::get().to(vendors::get_vendors))
            .route("/vendors/{id}", web::get().to(vendors::get_vendor_by_id))
            .route("/vendors/{id}/approve", web::post().to(vendors::approve_vendor))
            .route("/feedback", web::get().to(feedback::get_feedback))
            .route("/feedback/{id}", web::put().to(feedback::update_feedback_status)),
    );
}
