pub mod page;
pub mod records;
