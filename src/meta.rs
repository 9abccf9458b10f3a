use std::path::Path;

use crate::{
    core::Space,
    error::{VatError, VatResult},
};

/// The record a runtime decoder needs to invert quantization:
/// `original = min + pixel/255 * (max - min)`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VatMetadata {
    pub position: PositionBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<NormalBlock>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PositionBlock {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub frames: u32,
    pub vertices: u32,
    pub space: Space,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NormalBlock {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl NormalBlock {
    /// Normals always use the fixed [-1,1] range, no per-scene
    /// discovery.
    pub fn unit() -> Self {
        Self {
            min: [-1.0, -1.0, -1.0],
            max: [1.0, 1.0, 1.0],
        }
    }
}

pub fn write_json(meta: &VatMetadata, path: &Path) -> VatResult<()> {
    let bytes = serde_json::to_vec_pretty(meta)
        .map_err(|e| VatError::io(format!("serialize metadata: {e}")))?;
    std::fs::write(path, bytes)
        .map_err(|e| VatError::io(format!("write metadata '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape_matches_decoder_contract() {
        let meta = VatMetadata {
            position: PositionBlock {
                min: [-1.5, 0.0, 0.25],
                max: [2.5, 1.0, 0.25],
                frames: 12,
                vertices: 4,
                space: Space::Object,
            },
            normal: Some(NormalBlock::unit()),
        };

        let value: serde_json::Value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["position"]["min"][0], -1.5);
        assert_eq!(value["position"]["frames"], 12);
        assert_eq!(value["position"]["vertices"], 4);
        assert_eq!(value["position"]["space"], "object");
        assert_eq!(value["normal"]["min"][1], -1.0);
        assert_eq!(value["normal"]["max"][2], 1.0);
    }

    #[test]
    fn normal_block_is_omitted_when_absent() {
        let meta = VatMetadata {
            position: PositionBlock {
                min: [0.0; 3],
                max: [0.0; 3],
                frames: 1,
                vertices: 1,
                space: Space::World,
            },
            normal: None,
        };
        let value: serde_json::Value = serde_json::to_value(&meta).unwrap();
        assert!(value.get("normal").is_none());
        assert_eq!(value["position"]["space"], "world");
    }
}
