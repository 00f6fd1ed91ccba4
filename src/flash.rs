use log::{debug, trace, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FlashError;
use crate::message::Message;
use crate::session::SessionStore;

pub const DEFAULT_STORAGE_KEY: &str = "flash";

/// Message key to the list of messages stored under it. Keys and list
/// entries both keep the order they were added in.
pub type Messages = Map<String, Value>;

/// Flash messages for one request.
///
/// Construction promotes whatever the previous request queued in
/// `session[storage_key]` into the current view and empties that slot.
/// From then on the two buckets are independent:
///
/// - [`add_message`](Self::add_message) writes to the session only, so the
///   message is seen by the next request;
/// - [`add_message_now`](Self::add_message_now) and the `get*`/`clear*`
///   methods work on the current view only.
pub struct FlashStore<'a, S: SessionStore + ?Sized> {
    session: &'a mut S,
    storage_key: String,
    current: Messages,
}

impl<'a, S: SessionStore + ?Sized> FlashStore<'a, S> {
    /// Opens the store under [`DEFAULT_STORAGE_KEY`].
    pub fn new(session: &'a mut S) -> Self {
        Self::with_key(session, DEFAULT_STORAGE_KEY)
    }

    /// Opens the store under `storage_key`.
    ///
    /// A list slot is read as a bucket keyed by position (`"0"`, `"1"`, ...).
    /// Any other slot that is not a mapping is treated as empty.
    pub fn with_key(session: &'a mut S, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let current = match session.get_mut(&storage_key).map(Value::take) {
            None | Some(Value::Null) => Messages::new(),
            Some(Value::Object(bucket)) => promote(bucket),
            Some(Value::Array(items)) => promote(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, value)| (index.to_string(), value))
                    .collect(),
            ),
            Some(other) => {
                warn!(
                    "session slot '{}' holds {}, ignoring it",
                    storage_key,
                    kind_of(&other)
                );
                Messages::new()
            }
        };
        debug!(
            "promoted {} flash key(s) from session slot '{}'",
            current.len(),
            storage_key
        );
        session.insert(&storage_key, Value::Object(Map::new()));

        Self {
            session,
            storage_key,
            current,
        }
    }

    /// Like [`with_key`](Self::with_key) but refuses a scalar slot. The
    /// session is left untouched on error.
    pub fn try_with_key(
        session: &'a mut S,
        storage_key: impl Into<String>,
    ) -> Result<Self, FlashError> {
        let storage_key = storage_key.into();
        let found = match session.get(&storage_key) {
            None | Some(Value::Null) | Some(Value::Object(_)) | Some(Value::Array(_)) => None,
            Some(other) => Some(kind_of(other)),
        };
        match found {
            Some(found) => Err(FlashError::InvalidSlot {
                key: storage_key,
                found,
            }),
            None => Ok(Self::with_key(session, storage_key)),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Queues `message` under `key` for the next request.
    pub fn add_message(&mut self, key: &str, message: impl Into<Message>) {
        let value = message.into().into_stored();
        trace!("flash next [{}] <- {}", key, value);

        // The slot was reset to a mapping on construction and the session is
        // borrowed exclusively since.
        if let Some(Value::Object(bucket)) = self.session.get_mut(&self.storage_key) {
            if let Value::Array(items) = bucket
                .entry(key.to_string())
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                items.push(value);
            }
        }
    }

    /// Adds `message` under `key` for the current request.
    pub fn add_message_now(&mut self, key: &str, message: impl Into<Message>) {
        let value = message.into().into_stored();
        trace!("flash now [{}] <- {}", key, value);
        if let Value::Array(items) = self
            .current
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            items.push(value);
        }
    }

    /// Serializes `value` and queues it for the next request.
    pub fn add_serialized<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), FlashError> {
        self.add_message(key, Message::object(value)?);
        Ok(())
    }

    /// Serializes `value` and adds it for the current request.
    pub fn add_serialized_now<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), FlashError> {
        self.add_message_now(key, Message::object(value)?);
        Ok(())
    }

    pub fn get_messages(&self) -> &Messages {
        &self.current
    }

    pub fn get_message(&self, key: &str) -> Option<&Vec<Value>> {
        self.current.get(key).and_then(Value::as_array)
    }

    pub fn first_message(&self, key: &str) -> Option<&Value> {
        self.get_message(key).and_then(|messages| messages.first())
    }

    /// First message under `key`, or `default` when there is none.
    pub fn get_first_message(&self, key: &str, default: Option<Value>) -> Option<Value> {
        self.first_message(key).cloned().or(default)
    }

    /// True when `key` holds at least one message.
    pub fn has_message(&self, key: &str) -> bool {
        self.first_message(key).is_some()
    }

    pub fn clear_messages(&mut self) {
        trace!("flash now cleared");
        self.current.clear();
    }

    pub fn clear_message(&mut self, key: &str) {
        if self.current.remove(key).is_some() {
            trace!("flash now [{}] cleared", key);
        }
    }

    /// Consumes the store, returning the current view.
    pub fn into_messages(self) -> Messages {
        self.current
    }
}

fn promote(bucket: Map<String, Value>) -> Messages {
    bucket
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => Some((key, Value::Array(items))),
            single => Some((key, Value::Array(vec![single]))),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
