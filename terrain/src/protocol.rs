// src/protocol.rs

use serde::{Deserialize, Serialize};

use crate::coords::{Coords, MaterialId};
use crate::environment::EnvironmentStateEncoded;
use crate::error::TerrainError;
use crate::extent::ViewExtent;

/// Fills the world cell at `coords` with `material`, or clears it when
/// `material` is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCellEdit {
    pub coords: Coords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialId>,
}

/// Envelope exchanged over the event transport: `{ "name": ..., "args": ... }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "args", rename_all = "camelCase")]
pub enum Message {
    /// Client to server: the box the viewer currently sees.
    MoveView(ViewExtent),
    /// Server to client: a full or partial snapshot.
    EnvironmentState(EnvironmentStateEncoded),
    /// Client to server: edit one cell.
    AlterGridCell(GridCellEdit),
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Message::MoveView(_) => "moveView",
            Message::EnvironmentState(_) => "environmentState",
            Message::AlterGridCell(_) => "alterGridCell",
        }
    }

    pub fn to_json(&self) -> Result<String, TerrainError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, TerrainError> {
        Ok(serde_json::from_str(json)?)
    }
}
