//! Node and edge payloads.
//!
//! The data-change commands apply a *partial* update: fields present in the
//! patch overwrite, everything else is retained. [`Mergeable`] expresses that
//! for any payload type. [`Weighted`] exposes an edge's weight to the
//! shortest-path tracer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A payload that can absorb a partial update.
pub trait Mergeable: Clone {
    /// The partial form of the payload (all fields optional).
    type Patch: Clone + fmt::Debug + PartialEq;

    /// Overwrites the fields present in `patch`, keeping the rest.
    fn merge(&mut self, patch: &Self::Patch);
}

/// An edge payload carrying a numeric weight.
pub trait Weighted {
    fn weight(&self) -> f64;
}

impl Weighted for f64 {
    fn weight(&self) -> f64 {
        *self
    }
}

/// Shallow object merge. A non-object on either side is replaced wholesale.
impl Mergeable for serde_json::Value {
    type Patch = serde_json::Value;

    fn merge(&mut self, patch: &serde_json::Value) {
        match (self.as_object_mut(), patch.as_object()) {
            (Some(target), Some(fields)) => {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            _ => *self = patch.clone(),
        }
    }
}

/// Unit payloads have nothing to merge.
impl Mergeable for () {
    type Patch = ();

    fn merge(&mut self, _patch: &()) {}
}

impl Mergeable for f64 {
    type Patch = f64;

    fn merge(&mut self, patch: &f64) {
        *self = *patch;
    }
}

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Node payload used by the graph editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl NodeData {
    pub fn at(x: f64, y: f64) -> Self {
        NodeData {
            point: Point { x, y },
            ..NodeData::default()
        }
    }
}

/// Partial update for [`NodeData`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeDataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl Mergeable for NodeData {
    type Patch = NodeDataPatch;

    fn merge(&mut self, patch: &NodeDataPatch) {
        if let Some(text) = &patch.text {
            self.text = Some(text.clone());
        }
        if let Some(point) = patch.point {
            self.point = point;
        }
        if let Some(stroke) = &patch.stroke {
            self.stroke = Some(stroke.clone());
        }
        if let Some(fill) = &patch.fill {
            self.fill = Some(fill.clone());
        }
    }
}

/// Edge payload used by the graph editor and the shortest-path tracer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeData {
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl EdgeData {
    pub fn weighted(weight: f64) -> Self {
        EdgeData {
            weight,
            ..EdgeData::default()
        }
    }
}

impl Weighted for EdgeData {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Partial update for [`EdgeData`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeDataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl Mergeable for EdgeData {
    type Patch = EdgeDataPatch;

    fn merge(&mut self, patch: &EdgeDataPatch) {
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(stroke) = &patch.stroke {
            self.stroke = Some(stroke.clone());
        }
        if let Some(fill) = &patch.fill {
            self.fill = Some(fill.clone());
        }
    }
}
