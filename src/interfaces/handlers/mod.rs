pub mod contact;
pub mod contact_api;
pub mod system;
pub mod theme;
