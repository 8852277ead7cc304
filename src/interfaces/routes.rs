use actix_web::web;

mod api;
mod contact;
mod json_error;
mod system;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(contact::config_routes);
    cfg.configure(system::config_routes);

    cfg.service(
        web::scope("/api")
            .configure(api::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
