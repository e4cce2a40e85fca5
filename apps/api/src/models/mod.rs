pub mod sop;
pub mod user;
