pub mod api;
pub mod event;
