//! Message pipeline
//!
//! Flattens heterogeneous log arguments into one line of text. Types opt in
//! through [`Loggable`]; anything `Debug` can be passed through
//! [`Debugged`].

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug};

/// One rendered-on-demand log argument.
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    /// Plain text, used verbatim.
    Text(String),
    /// Lists and maps, dumped across several lines.
    Aggregate(Value),
    /// A structured object, already rendered as a reconstructable literal.
    Object(String),
}

impl LogArg {
    pub fn text(s: impl fmt::Display) -> Self {
        LogArg::Text(s.to_string())
    }

    /// Serialize `value` as an aggregate. Values serde cannot represent
    /// fall back to their `Debug` form.
    pub fn aggregate<T: Serialize + Debug + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => LogArg::Aggregate(v),
            Err(_) => LogArg::object(value),
        }
    }

    pub fn object<T: Debug + ?Sized>(value: &T) -> Self {
        LogArg::Object(format!("{value:#?}"))
    }

    pub fn render(&self) -> String {
        match self {
            LogArg::Text(s) | LogArg::Object(s) => s.clone(),
            LogArg::Aggregate(Value::String(s)) => s.clone(),
            // Empty containers still dump across lines, unlike `[]`.
            LogArg::Aggregate(Value::Array(items)) if items.is_empty() => "[\n]".to_string(),
            LogArg::Aggregate(Value::Object(map)) if map.is_empty() => "{\n}".to_string(),
            LogArg::Aggregate(v) => {
                serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
            }
        }
    }
}

/// Join rendered arguments with single spaces, keeping their order.
pub fn flatten(args: &[LogArg]) -> String {
    args.iter().map(LogArg::render).collect::<Vec<_>>().join(" ")
}

/// Renderable for logging.
pub trait Loggable {
    fn to_log_arg(&self) -> LogArg;
}

impl<T: Loggable + ?Sized> Loggable for &T {
    fn to_log_arg(&self) -> LogArg {
        (**self).to_log_arg()
    }
}

impl Loggable for LogArg {
    fn to_log_arg(&self) -> LogArg {
        self.clone()
    }
}

macro_rules! loggable_as_text {
    ($($t:ty),* $(,)?) => {
        $(impl Loggable for $t {
            fn to_log_arg(&self) -> LogArg {
                LogArg::text(self)
            }
        })*
    };
}

loggable_as_text!(str, String, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Loggable for Value {
    fn to_log_arg(&self) -> LogArg {
        LogArg::Aggregate(self.clone())
    }
}

impl<T: Serialize + Debug> Loggable for [T] {
    fn to_log_arg(&self) -> LogArg {
        LogArg::aggregate(self)
    }
}

impl<T: Serialize + Debug> Loggable for Vec<T> {
    fn to_log_arg(&self) -> LogArg {
        LogArg::aggregate(self)
    }
}

impl<K: Serialize + Debug, V: Serialize + Debug, S> Loggable for HashMap<K, V, S>
where
    HashMap<K, V, S>: Serialize,
{
    fn to_log_arg(&self) -> LogArg {
        LogArg::aggregate(self)
    }
}

impl<K: Serialize + Debug, V: Serialize + Debug> Loggable for BTreeMap<K, V> {
    fn to_log_arg(&self) -> LogArg {
        LogArg::aggregate(self)
    }
}

/// Logs any `Debug` value as an object dump.
pub struct Debugged<'a, T: Debug + ?Sized>(pub &'a T);

impl<T: Debug + ?Sized> Loggable for Debugged<'_, T> {
    fn to_log_arg(&self) -> LogArg {
        LogArg::object(self.0)
    }
}
