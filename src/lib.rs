//! Terminal product catalog: a paged, filterable item list with persistent
//! favorites and an in-memory product image cache.

pub mod app;
pub mod catalog;
pub mod favorites;
pub mod images;
