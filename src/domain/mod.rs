pub mod entities;
pub mod i18n;
pub mod use_cases;
