pub mod user_repo;
pub use user_repo::UserRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod contract_repo;
pub use contract_repo::ContractRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod notice_repo;
pub use notice_repo::NoticeRepository;
