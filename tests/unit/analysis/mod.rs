pub mod extraction;
pub mod table;
