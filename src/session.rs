//! The session shape a [`FlashStore`](crate::FlashStore) works against.
//!
//! Loading and persisting the session is up to the caller; the store only
//! reads, writes and checks keys on an already loaded mapping.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Session data as most backends hand it over: string keys to JSON values.
pub type SessionData = Map<String, Value>;

/// String-keyed mutable mapping holding a request's session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<&Value>;

    fn get_mut(&mut self, key: &str) -> Option<&mut Value>;

    fn insert(&mut self, key: &str, value: Value);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl SessionStore for Map<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        Map::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        Map::get_mut(self, key)
    }

    fn insert(&mut self, key: &str, value: Value) {
        Map::insert(self, key.to_string(), value);
    }

    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl SessionStore for HashMap<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        HashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        HashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: &str, value: Value) {
        HashMap::insert(self, key.to_string(), value);
    }

    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}
