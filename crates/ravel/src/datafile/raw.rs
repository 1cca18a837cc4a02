//! Serde mirror of the on-disk JSON document.
//!
//! Kept separate from the dense in-memory form so the document shape can stay
//! tolerant: index-0 entries may be `null` or `{}`, `accepts` may be a boolean
//! or an integer, and transition maps arrive with string keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct RawDataFile {
    #[serde(default)]
    pub input_to_symbol: Vec<u32>,
    #[serde(default)]
    pub forwards: Vec<Option<RawState>>,
    #[serde(default)]
    pub backwards: Vec<Option<RawState>>,
    #[serde(default)]
    pub vertices: Vec<Option<RawVertex>>,
    #[serde(default)]
    pub null_edges: Vec<Vec<(u32, u32)>>,
    #[serde(default)]
    pub char_edges: Vec<Vec<(u32, u32)>>,
    pub start_vertex: u32,
    pub final_vertex: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RawState {
    pub transitions: BTreeMap<String, u32>,
    pub accepts: Accepts,
}

/// `accepts` appears as a boolean in newer documents and as 0/1 in older ones.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum Accepts {
    Bool(bool),
    Int(i64),
}

impl Default for Accepts {
    fn default() -> Self {
        Self::Bool(false)
    }
}

impl Accepts {
    pub(crate) const fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RawVertex {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_vertex: Option<u32>,
}
