// Stored Statements of Purpose: ownership-scoped storage and the document API.

pub mod handlers;
pub mod memory;
pub mod store;
