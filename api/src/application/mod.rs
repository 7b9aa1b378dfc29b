pub mod pagination;
pub mod ports;
pub mod use_cases;
