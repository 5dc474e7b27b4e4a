pub mod kv;
mod repository;
mod schema;
pub mod terms;

pub use repository::ReportRepository;
pub use schema::SCHEMA;
