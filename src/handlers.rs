pub mod auth;
pub mod contracts;
pub mod documents;
pub mod financial;
pub mod notice;
pub mod properties;
pub mod upload_form;
