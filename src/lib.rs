#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

//! Client-side engine for a streaming chat application.
//!
//! The crate owns the three pieces of the client with real state and ordering
//! concerns: the transport adapter that speaks to the chat service, the
//! session/message store, and the orchestration layer that drives the
//! send/stream/finalize protocol. Rendering is left to the embedding
//! application, which reads the store and dispatches orchestration calls.
//!
//! ```no_run
//! use colloquy::configuration::Config;
//! use colloquy::domain::services::ChatService;
//! use colloquy::infrastructure::api::ApiClient;
//!
//! # async fn run() {
//! Config::load_from_env();
//!
//! let mut service = ChatService::new(Box::<ApiClient>::default());
//! service.load_history().await;
//! service.send_message("What does the uploaded contract say about renewals?").await;
//!
//! let session_id = service.ensure_session();
//! for message in service.store().messages(&session_id) {
//!     println!("{:?}: {}", message.role, message.content);
//! }
//! # }
//! ```

pub mod configuration;
pub mod domain;
pub mod infrastructure;
