//! Serialization of persisted records.
//!
//! A record is the full state plus the schema version it was written with.
//! Decoding merges the stored state over a caller-supplied default, so a
//! record written before a field existed still loads.

use crate::error::CodecError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A state decoded from storage together with its recorded version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<S> {
    /// The decoded state
    pub state: S,
    /// Version marker found in the record, if any
    pub version: Option<u32>,
}

/// Turns a state into record text and back
pub trait Codec<S>: Send + Sync {
    /// Encode `state` tagged with `version`
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the state cannot be serialized.
    fn encode(&self, state: &S, version: u32) -> Result<String, CodecError>;

    /// Decode record text, taking fields the record lacks from `default`
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if `raw` is not a valid record, or
    /// [`CodecError::Encode`] if `default` cannot be serialized for merging.
    fn decode(&self, raw: &str, default: &S) -> Result<Decoded<S>, CodecError>;
}

/// JSON codec writing `{"state": <state>, "version": <n>}`
///
/// On decode the stored `state` object is shallow-merged over the default:
/// top-level fields present in the record win, the rest come from the
/// default.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[derive(Serialize)]
struct EnvelopeRef<'a, S> {
    state: &'a S,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: Value,
    #[serde(default)]
    version: Option<u32>,
}

impl<S> Codec<S> for JsonCodec
where
    S: Serialize + DeserializeOwned,
{
    fn encode(&self, state: &S, version: u32) -> Result<String, CodecError> {
        serde_json::to_string(&EnvelopeRef { state, version }).map_err(CodecError::Encode)
    }

    fn decode(&self, raw: &str, default: &S) -> Result<Decoded<S>, CodecError> {
        let envelope: Envelope = serde_json::from_str(raw).map_err(CodecError::Decode)?;
        let merged = match envelope.state {
            Value::Object(stored) => {
                let mut base = serde_json::to_value(default).map_err(CodecError::Encode)?;
                match base.as_object_mut() {
                    Some(fields) => fields.extend(stored),
                    None => base = Value::Object(stored),
                }
                base
            }
            other => other,
        };

        Ok(Decoded {
            state: serde_json::from_value(merged).map_err(CodecError::Decode)?,
            version: envelope.version,
        })
    }
}
