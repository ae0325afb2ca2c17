pub mod fields;
pub mod session;
