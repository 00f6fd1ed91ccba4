//! Flash messages on top of a session key/value store.
//!
//! A [`FlashStore`] is built once per request over the request's session.
//! Messages queued with [`FlashStore::add_message`] land in the session and
//! show up on the next request; messages added with
//! [`FlashStore::add_message_now`] are only visible for the current one.
//!
//! ```
//! use justflash::{FlashStore, SessionData};
//! use serde_json::json;
//!
//! let mut session = SessionData::new();
//! session.insert("flash".into(), json!({ "error": ["An error"] }));
//!
//! let mut flash = FlashStore::new(&mut session);
//! flash.add_message_now("error", "Another error");
//! assert_eq!(
//!     flash.get_message("error"),
//!     Some(&vec![json!("An error"), json!("Another error")])
//! );
//! ```
pub mod config;
pub mod error;
pub mod flash;
pub mod logger;
pub mod message;
pub mod session;

pub use config::FlashConfig;
pub use error::FlashError;
pub use flash::{FlashStore, Messages, DEFAULT_STORAGE_KEY};
pub use logger::setup_logger;
pub use message::Message;
pub use session::{SessionData, SessionStore};
