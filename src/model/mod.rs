//! Record types managed by the REST API
//!
//! Both resources share the same envelope: a store-assigned identifier and
//! two server-owned timestamps (`created`, `lastUpdated`). Every other field
//! is client payload and is replaced wholesale on update.

pub mod alert;
pub mod receiver;

pub use alert::Alert;
pub use receiver::Receiver;

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};

/// A record type owned by one collection
///
/// Implemented by [`Alert`] and [`Receiver`]; the resource controller, the
/// store and the HTTP handlers are all generic over it.
pub trait Resource:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + Unpin + 'static
{
    /// Collection name; doubles as the URL segment under `/v1`
    const COLLECTION: &'static str;

    /// Singular name used in log lines
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn created(&self) -> DateTime<Utc>;

    fn set_created(&mut self, at: DateTime<Utc>);

    fn last_updated(&self) -> DateTime<Utc>;

    fn set_last_updated(&mut self, at: DateTime<Utc>);
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Ignored(IgnoredAny),
}

/// Decode a server-owned field, falling back to its default on a type mismatch
///
/// Used for `id`, `created` and `lastUpdated`: the server overwrites them
/// anyway, so a malformed value in a request body must not reject the record.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Valid(value) => value,
        Lenient::Ignored(_) => T::default(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[path = "model_test.rs"]
mod tests;
