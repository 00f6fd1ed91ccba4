use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::FlashError;

/// A flash message before it is stored.
///
/// Scalars are stored as their string form; collections and objects are
/// stored as they are.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    Number(Number),
    Boolean(bool),
    /// Arrays, maps and `null`.
    Structured(Value),
    /// A serialized Rust value, see [`Message::object`].
    Object(Value),
}

impl Message {
    /// Serializes `value` into an opaque [`Message::Object`].
    pub fn object<T: Serialize + ?Sized>(value: &T) -> Result<Self, FlashError> {
        Ok(Message::Object(serde_json::to_value(value)?))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Message::Text(_) | Message::Number(_) | Message::Boolean(_)
        )
    }

    /// The value written into a message bucket.
    pub fn into_stored(self) -> Value {
        match self {
            Message::Text(text) => Value::String(text),
            Message::Number(n) => Value::String(number_to_string(&n)),
            Message::Boolean(b) => Value::String(b.to_string()),
            Message::Structured(value) | Message::Object(value) => value,
        }
    }
}

// Integral floats print without a fraction ("2", not "2.0").
fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64()
            .map(|f| f.to_string())
            .unwrap_or_else(|| n.to_string())
    }
}

fn float_message(f: f64) -> Message {
    Number::from_f64(f)
        .map(Message::Number)
        .unwrap_or_else(|| Message::Text(f.to_string()))
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_owned())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Message::Text(text.clone())
    }
}

impl From<bool> for Message {
    fn from(b: bool) -> Self {
        Message::Boolean(b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Message {
                fn from(n: $t) -> Self {
                    Message::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Message {
    fn from(f: f64) -> Self {
        float_message(f)
    }
}

impl From<f32> for Message {
    fn from(f: f32) -> Self {
        // Go through the shortest decimal form so 0.1f32 stays "0.1".
        match f.to_string().parse::<f64>() {
            Ok(wide) if f.is_finite() => float_message(wide),
            _ => Message::Text(f.to_string()),
        }
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Message::Text(text),
            Value::Number(n) => Message::Number(n),
            Value::Bool(b) => Message::Boolean(b),
            other => Message::Structured(other),
        }
    }
}
