use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    core::{DVec3, FrameSpan, Space},
    error::{VatError, VatResult},
    export_obj,
    scene::{SceneHost, SceneReader, SceneWriter, TimeCursor, UvApplyOutcome},
    uv::UvLayout,
};

/// A self-contained animated scene loaded from JSON. Serves as the
/// reference host implementation: per-frame poses are stored
/// explicitly, so sampling is a map lookup rather than an evaluation.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneDoc {
    pub playback: FrameSpan,
    pub meshes: BTreeMap<String, MeshDoc>,
    #[serde(skip)]
    cursor: Option<i32>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MeshDoc {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triangles: Vec<[u32; 3]>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub uv_sets: BTreeMap<String, Vec<[f64; 2]>>,
    /// Keyed by frame number. JSON object keys are strings; serde_json
    /// handles the i32 conversion for BTreeMap keys.
    pub frames: BTreeMap<i32, FramePose>,
}

/// One mesh's sampled state at a single frame. `origin` is the mesh
/// transform's translation; `positions` are local to it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FramePose {
    #[serde(default)]
    pub origin: [f64; 3],
    pub positions: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<[f64; 3]>>,
}

impl MeshDoc {
    /// Vertex count from the first stored frame. `validate` guarantees
    /// all frames agree.
    pub fn vertex_count(&self) -> usize {
        self.frames
            .values()
            .next()
            .map_or(0, |pose| pose.positions.len())
    }

    fn pose(&self, frame: i32) -> VatResult<&FramePose> {
        self.frames
            .get(&frame)
            .ok_or_else(|| VatError::host(format!("no sample for frame {frame}")))
    }
}

impl SceneDoc {
    pub fn load(path: &Path) -> VatResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| VatError::io(format!("read scene '{}': {e}", path.display())))?;
        let doc: Self = serde_json::from_str(&text)
            .map_err(|e| VatError::io(format!("parse scene '{}': {e}", path.display())))?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn save(&self, path: &Path) -> VatResult<()> {
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| VatError::io(format!("serialize scene: {e}")))?;
        std::fs::write(path, bytes)
            .map_err(|e| VatError::io(format!("write scene '{}': {e}", path.display())))
    }

    pub fn validate(&self) -> VatResult<()> {
        if self.playback.start > self.playback.end {
            return Err(VatError::config(format!(
                "playback span {}..{} is inverted",
                self.playback.start, self.playback.end
            )));
        }
        for (name, mesh) in &self.meshes {
            if mesh.frames.is_empty() {
                return Err(VatError::config(format!("mesh '{name}' has no frames")));
            }
            let vertices = mesh.vertex_count();
            for (frame, pose) in &mesh.frames {
                if pose.positions.len() != vertices {
                    return Err(VatError::config(format!(
                        "mesh '{name}' frame {frame} has {} positions, expected {vertices}",
                        pose.positions.len()
                    )));
                }
                if let Some(normals) = &pose.normals {
                    if normals.len() != vertices {
                        return Err(VatError::config(format!(
                            "mesh '{name}' frame {frame} has {} normals, expected {vertices}",
                            normals.len()
                        )));
                    }
                }
            }
            for tri in &mesh.triangles {
                for &idx in tri {
                    if idx as usize >= vertices {
                        return Err(VatError::config(format!(
                            "mesh '{name}' triangle index {idx} exceeds {vertices} vertices"
                        )));
                    }
                }
            }
            for (set, coords) in &mesh.uv_sets {
                if coords.len() != vertices {
                    return Err(VatError::config(format!(
                        "mesh '{name}' uv set '{set}' has {} coords, expected {vertices}",
                        coords.len()
                    )));
                }
            }
        }
        Ok(())
    }

    fn mesh(&self, name: &str) -> VatResult<&MeshDoc> {
        self.meshes
            .get(name)
            .ok_or_else(|| VatError::host(format!("mesh '{name}' not found in scene")))
    }
}

impl TimeCursor for SceneDoc {
    fn current_frame(&self) -> i32 {
        self.cursor.unwrap_or(self.playback.start)
    }

    fn set_frame(&mut self, frame: i32) -> VatResult<()> {
        self.cursor = Some(frame);
        Ok(())
    }
}

impl SceneReader for SceneDoc {
    fn mesh_exists(&self, mesh: &str) -> bool {
        self.meshes.contains_key(mesh)
    }

    fn vertex_count(&self, mesh: &str) -> VatResult<usize> {
        Ok(self.mesh(mesh)?.vertex_count())
    }

    fn positions(&mut self, mesh: &str, frame: i32, space: Space) -> VatResult<Vec<DVec3>> {
        self.set_frame(frame)?;
        let pose = self.mesh(mesh)?.pose(frame)?;
        let origin = DVec3::from_array(pose.origin);
        Ok(pose
            .positions
            .iter()
            .map(|p| {
                let local = DVec3::from_array(*p);
                match space {
                    Space::World => origin + local,
                    Space::Object => local,
                }
            })
            .collect())
    }

    fn normals(&mut self, mesh: &str, frame: i32) -> VatResult<Vec<DVec3>> {
        self.set_frame(frame)?;
        let pose = self.mesh(mesh)?.pose(frame)?;
        let normals = pose.normals.as_ref().ok_or_else(|| {
            VatError::host(format!("mesh '{mesh}' has no normals at frame {frame}"))
        })?;
        Ok(normals.iter().map(|n| DVec3::from_array(*n)).collect())
    }

    fn playback_span(&self) -> FrameSpan {
        self.playback
    }
}

impl SceneWriter for SceneDoc {
    fn apply_uv_layout(
        &mut self,
        mesh: &str,
        uv_set: &str,
        layout: &UvLayout,
        force: bool,
    ) -> VatResult<UvApplyOutcome> {
        let vertices = self.mesh(mesh)?.vertex_count();
        if layout.vertex_count() != vertices {
            return Err(VatError::host(format!(
                "uv layout has {} coords but mesh '{mesh}' has {vertices} vertices",
                layout.vertex_count()
            )));
        }
        let doc = self
            .meshes
            .get_mut(mesh)
            .ok_or_else(|| VatError::host(format!("mesh '{mesh}' not found in scene")))?;
        if doc.uv_sets.contains_key(uv_set) && !force {
            return Ok(UvApplyOutcome::Skipped);
        }
        doc.uv_sets
            .insert(uv_set.to_string(), layout.coords().to_vec());
        Ok(UvApplyOutcome::Created)
    }

    fn export_mesh(&mut self, mesh: &str, out_path: &Path, uv_set: &str) -> VatResult<PathBuf> {
        let frame = self.current_frame();
        let doc = self.mesh(mesh)?;
        if doc.triangles.is_empty() {
            return Err(VatError::host(format!(
                "mesh '{mesh}' has no triangles to export"
            )));
        }
        let uvs = doc
            .uv_sets
            .get(uv_set)
            .ok_or_else(|| VatError::host(format!("mesh '{mesh}' has no uv set '{uv_set}'")))?
            .clone();
        let triangles = doc.triangles.clone();
        let positions = self.positions(mesh, frame, Space::World)?;
        export_obj::write_obj(out_path, &positions, &uvs, &triangles)?;
        Ok(out_path.to_path_buf())
    }
}

impl SceneHost for SceneDoc {
    fn writer(&mut self) -> Option<&mut dyn SceneWriter> {
        Some(self)
    }
}
