use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::epoch;
use crate::error::FetchError;

/// Status document served by the proxy at `/stats`.
///
/// Only the fields the dashboard derives from are typed; everything else is
/// kept in `extra` and handed to the template untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDocument {
    /// Current chain height.
    pub height: u64,

    /// Server time in milliseconds since the Unix epoch.
    pub now: i64,

    /// Connected miners. `null` and absent are both accepted.
    #[serde(default)]
    pub miners: Option<Vec<Miner>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A miner entry. `name` is the sort key; other fields pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Miner {
    pub name: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Miner {
    /// Create a miner with no extra fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
        }
    }

    /// Attach a pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// A status document ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDocument {
    #[serde(flatten)]
    pub status: StatusDocument,

    /// Predicted timestamp (ms) of the next epoch boundary.
    #[serde(rename = "nextEpoch")]
    pub next_epoch: i64,
}

impl StatusDocument {
    /// Decode and validate a status document from a JSON body.
    pub fn decode(body: &[u8]) -> Result<Self, FetchError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Create a document with no miners and no extra fields.
    pub fn new(height: u64, now: i64) -> Self {
        Self {
            height,
            now,
            miners: None,
            extra: Map::new(),
        }
    }

    /// Sort miners by name. Absent miners are left alone.
    pub fn sort_miners(&mut self) {
        if let Some(miners) = self.miners.as_mut() {
            miners.sort_by(|a, b| compare_names(&a.name, &b.name));
        }
    }

    /// Sort miners and derive `nextEpoch`.
    pub fn into_display(mut self) -> DisplayDocument {
        self.sort_miners();
        let next_epoch = epoch::next_epoch(self.height, self.now);
        DisplayDocument {
            status: self,
            next_epoch,
        }
    }
}

impl DisplayDocument {
    /// JSON value used as the template context.
    pub fn to_context(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Miner names in display order.
    pub fn miner_names(&self) -> Vec<&str> {
        self.status
            .miners
            .iter()
            .flatten()
            .map(|m| m.name.as_str())
            .collect()
    }
}

/// Plain lexicographic comparison over UTF-16 code units.
///
/// No locale or case folding. UTF-16 order differs from `str` order only for
/// characters above U+FFFF, which sort before U+E000..U+FFFF here.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}
