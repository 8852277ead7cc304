use actix_web::web;

use crate::handlers::contact::{contact_page, submit_contact};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(contact_page)
        .service(submit_contact);
}
