mod document;
mod error;
mod message;
mod status;
mod transport;

pub use document::*;
pub use error::*;
pub use message::*;
pub use status::*;
pub use transport::*;
