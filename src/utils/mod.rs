pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod response;
pub mod serde;
