//! Marker re-tagging: every marker in a batch gets the circle icon and is
//! collected into a caller-owned [`ClusterState`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::WatchError;

/// A map marker. Fields other than `icon` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Marker {
    pub fn set_icon(&mut self, icon: Value) {
        self.icon = Some(icon);
    }
}

/// Input message: markers keyed by id plus the icon to apply.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerBatch {
    pub list: Map<String, Value>,
    pub circle: Value,
}

impl MarkerBatch {
    pub fn from_json(input: &str) -> Result<Self, WatchError> {
        Ok(serde_json::from_str(input)?)
    }
}

/// Markers clustered by the most recent batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterState {
    pub markers: Vec<Marker>,
}

impl ClusterState {
    pub fn to_json(&self) -> Result<String, WatchError> {
        Ok(serde_json::to_string(&self.markers)?)
    }
}

/// Replace `state` with the batch's markers, each tagged with the circle icon.
pub fn retag(batch: MarkerBatch, state: &mut ClusterState) -> Result<(), WatchError> {
    state.markers.clear();
    for (_, value) in batch.list {
        let mut marker: Marker = serde_json::from_value(value)?;
        marker.set_icon(batch.circle.clone());
        state.markers.push(marker);
    }
    Ok(())
}
