pub mod contact;
pub mod honeypot;
pub mod notifier;
pub mod snapshot;
