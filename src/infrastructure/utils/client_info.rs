use actix_web::{http::header, HttpRequest};

use crate::entities::contact::ClientInfo;

/// Extract the client's IP address from the request, considering X-Forwarded-For if trusted
/// `trust_x_forwarded_for`: whether to trust the X-Forwarded-For header
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> Option<String> {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }
    }
    req.peer_addr().map(|addr| addr.ip().to_string())
}

/// Collects the request details stored as submission metadata.
pub fn client_info(req: &HttpRequest, trust_x_forwarded_for: bool) -> ClientInfo {
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let host = req.connection_info().host().to_string();

    ClientInfo {
        ip: get_client_ip(req, trust_x_forwarded_for),
        user_agent,
        host: (!host.is_empty()).then_some(host),
    }
}
