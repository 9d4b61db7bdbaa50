mod builder;
mod read_op;
pub mod record;
mod write_op;

pub use record::{Record, Schema};

#[cfg(test)]
mod tests;
