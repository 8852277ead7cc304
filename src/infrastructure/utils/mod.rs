pub mod client_info;
pub mod cors;
pub mod html;
