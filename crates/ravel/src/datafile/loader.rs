//! Container decoding and structural verification.

use std::borrow::Cow;
use std::io::Read;

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::raw::{RawDataFile, RawState, RawVertex};
use super::{BackwardState, DataFile, EdgeList, ForwardState, Vertex, VertexKind};
use crate::error::DataFileError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub(crate) fn from_slice(bytes: &[u8]) -> Result<DataFile, DataFileError> {
    let document: Cow<'_, [u8]> = if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        flate2::read::GzDecoder::new(bytes)
            .read_to_end(&mut inflated)
            .map_err(|e| DataFileError::Decode(format!("gzip: {e}")))?;
        Cow::Owned(inflated)
    } else {
        Cow::Borrowed(bytes)
    };
    let raw: RawDataFile = serde_json::from_slice(&document)
        .map_err(|e| DataFileError::Decode(e.to_string()))?;
    build(raw)
}

/// Convert the raw document into the dense form, verifying invariants.
pub(crate) fn build(raw: RawDataFile) -> Result<DataFile, DataFileError> {
    if raw.forwards.len() < 2 || raw.backwards.len() < 2 {
        return Err(DataFileError::Invalid(
            "both automata must define states 0 and 1".into(),
        ));
    }
    if raw.null_edges.len() != raw.char_edges.len() {
        return Err(DataFileError::Invalid(format!(
            "null_edges and char_edges differ in length ({} vs {})",
            raw.null_edges.len(),
            raw.char_edges.len()
        )));
    }
    if raw.null_edges.len() < 2 {
        return Err(DataFileError::Invalid(
            "edge-set tables must define entries 0 and 1".into(),
        ));
    }
    if raw.backwards.len() > raw.null_edges.len() {
        return Err(DataFileError::Invalid(format!(
            "backward automaton has {} states but only {} edge sets exist",
            raw.backwards.len(),
            raw.null_edges.len()
        )));
    }
    if raw.vertices.is_empty() {
        return Err(DataFileError::Invalid("vertex table is empty".into()));
    }

    // The forward alphabet spans the symbol map and every transition key.
    let mut symbol_count = raw
        .input_to_symbol
        .iter()
        .map(|&s| s as usize + 1)
        .max()
        .unwrap_or(1);
    for state in raw.forwards.iter().flatten() {
        for key in state.transitions.keys() {
            let symbol = parse_id(key, "forward transition symbol")?;
            symbol_count = symbol_count.max(symbol as usize + 1);
        }
    }

    let forward_count = raw.forwards.len();
    let forwards = raw
        .forwards
        .iter()
        .map(|state| forward_state(state.as_ref(), symbol_count, forward_count))
        .collect::<Result<Vec<_>, _>>()?;

    let backward_count = raw.backwards.len();
    let backwards = raw
        .backwards
        .iter()
        .map(|state| backward_state(state.as_ref(), forward_count, backward_count))
        .collect::<Result<Vec<_>, _>>()?;

    let vertex_count = raw.vertices.len();
    let vertices = raw
        .vertices
        .iter()
        .map(|v| vertex(v.as_ref(), vertex_count))
        .collect::<Result<Vec<_>, _>>()?;

    let null_edges = edge_table(&raw.null_edges, vertex_count, "null_edges")?;
    let char_edges = edge_table(&raw.char_edges, vertex_count, "char_edges")?;

    for (name, id) in [("start_vertex", raw.start_vertex), ("final_vertex", raw.final_vertex)] {
        if id == 0 || id as usize >= vertex_count {
            return Err(DataFileError::Invalid(format!("{name} {id} is not a real vertex")));
        }
    }

    Ok(DataFile {
        input_to_symbol: raw.input_to_symbol,
        forwards,
        backwards,
        vertices,
        null_edges,
        char_edges,
        start_vertex: raw.start_vertex,
        final_vertex: raw.final_vertex,
    })
}

fn parse_id(key: &str, what: &str) -> Result<u32, DataFileError> {
    key.parse::<u32>()
        .map_err(|_| DataFileError::Invalid(format!("{what} {key:?} is not an integer")))
}

fn forward_state(
    state: Option<&RawState>,
    symbol_count: usize,
    state_count: usize,
) -> Result<ForwardState, DataFileError> {
    let mut row = vec![0; symbol_count];
    let mut accepts = false;
    if let Some(state) = state {
        accepts = state.accepts.as_bool();
        for (key, &target) in &state.transitions {
            if target as usize >= state_count {
                return Err(DataFileError::Invalid(format!(
                    "forward transition targets unknown state {target}"
                )));
            }
            let symbol = parse_id(key, "forward transition symbol")?;
            row[symbol as usize] = target;
        }
    }
    Ok(ForwardState { row, accepts })
}

fn backward_state(
    state: Option<&RawState>,
    forward_count: usize,
    state_count: usize,
) -> Result<BackwardState, DataFileError> {
    let mut transitions = HashMap::with_hasher(ahash::RandomState::new());
    let mut accepts = false;
    if let Some(state) = state {
        accepts = state.accepts.as_bool();
        for (key, &target) in &state.transitions {
            if target as usize >= state_count {
                return Err(DataFileError::Invalid(format!(
                    "backward transition targets unknown state {target}"
                )));
            }
            let forward = parse_id(key, "backward transition input")?;
            if forward as usize >= forward_count {
                return Err(DataFileError::Invalid(format!(
                    "backward transition keyed by unknown forward state {forward}"
                )));
            }
            transitions.insert(forward, target);
        }
    }
    Ok(BackwardState { transitions, accepts })
}

fn vertex(raw: Option<&RawVertex>, vertex_count: usize) -> Result<Vertex, DataFileError> {
    let Some(raw) = raw else {
        return Ok(Vertex::default());
    };
    let kind = match raw.kind.as_deref() {
        None | Some("") => None,
        Some("start") => Some(VertexKind::Start),
        Some("final") => Some(VertexKind::Final),
        Some("if") => Some(VertexKind::If),
        Some("fi") => Some(VertexKind::Fi),
        Some(other) => {
            return Err(DataFileError::Invalid(format!("unknown vertex type {other:?}")));
        }
    };
    for (name, id) in [("with", raw.with), ("stack_vertex", raw.stack_vertex)] {
        if let Some(id) = id {
            if id as usize >= vertex_count {
                return Err(DataFileError::Invalid(format!(
                    "vertex {name} targets unknown vertex {id}"
                )));
            }
        }
    }
    Ok(Vertex {
        kind,
        text: raw.text.as_deref().map(Into::into),
        with: raw.with,
        sort_key: raw.sort_key.unwrap_or(0),
        stack_vertex: raw.stack_vertex,
    })
}

fn edge_table(
    table: &[Vec<(u32, u32)>],
    vertex_count: usize,
    name: &str,
) -> Result<Vec<EdgeList>, DataFileError> {
    table
        .iter()
        .map(|edges| {
            let mut list = SmallVec::with_capacity(edges.len());
            for &(from, to) in edges {
                if from as usize >= vertex_count || to as usize >= vertex_count {
                    return Err(DataFileError::Invalid(format!(
                        "{name} entry ({from}, {to}) leaves the vertex table"
                    )));
                }
                list.push((from, to));
            }
            Ok(list)
        })
        .collect()
}
