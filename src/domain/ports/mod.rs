pub mod access_policy;
pub mod document_repository;

pub use access_policy::{AccessPolicy, Action};
pub use document_repository::DocumentRepository;
