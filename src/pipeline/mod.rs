pub mod converter;
pub mod page_processor;
