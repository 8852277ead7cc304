use actix_web::web;

use crate::handlers::system::{health_check, home};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);
}
