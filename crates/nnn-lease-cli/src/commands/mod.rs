pub mod expenses;
pub mod lease;
