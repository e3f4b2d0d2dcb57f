pub mod auth;
pub mod billing_service;
pub mod contract_service;
pub mod document_service;
pub mod inspection_service;
pub mod property_service;
