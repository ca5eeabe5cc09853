mod chat_service;
mod chat_store;

pub use chat_service::*;
pub use chat_store::*;
