use actix_web::web;

use crate::handlers::{
    contact_api::{contact_token, submit_contact_api},
    theme::set_theme,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_contact_api)
        .service(contact_token)
        .service(set_theme);
}
