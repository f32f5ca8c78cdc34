pub mod error;
pub mod form;
pub mod i18n;
