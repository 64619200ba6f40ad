pub mod batch;
pub mod codes;
pub(crate) mod common;
pub mod compare;
pub mod find;
pub mod key;
pub mod parse;
pub mod species;
