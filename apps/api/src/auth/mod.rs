// Identity: password credentials, signed session tokens, and the extractor
// that resolves zero-or-one user id from a request.

pub mod handlers;
pub mod memory;
pub mod password;
pub mod session;
pub mod store;
