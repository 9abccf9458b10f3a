use std::path::PathBuf;

use crate::{
    core::{DVec3, FrameSpan, Space},
    error::{VatError, VatResult},
    meta::{NormalBlock, PositionBlock, VatMetadata},
    png::RgbGrid,
    remap::{quantize_channel, DeltaRange},
    scene::{with_restored_cursor, SceneHost, UvApplyOutcome},
    uv::UvLayout,
};

/// What to do when the scene host refuses an optional mutation step
/// (UV write, mesh export). Texture and metadata artifacts are never
/// optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record a warning in the report and keep going.
    #[default]
    BestEffort,
    /// Abort the run on the first host failure.
    Strict,
}

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub mesh: String,
    pub output_dir: PathBuf,
    /// Defaults to the host's playback span when unset.
    pub frame_start: Option<i32>,
    pub frame_end: Option<i32>,
    pub include_normals: bool,
    pub export_mesh: bool,
    pub space: Space,
    pub uv_set_name: String,
    pub force_uv: bool,
    /// Drop the first frame from the texture. Its delta is zero by
    /// construction, so row 0 of the remaining frames carries real
    /// motion instead of a wasted scanline.
    pub skip_first_frame: bool,
    pub on_host_failure: FailurePolicy,
}

impl EncodeConfig {
    pub fn new(mesh: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            mesh: mesh.into(),
            output_dir: output_dir.into(),
            frame_start: None,
            frame_end: None,
            include_normals: false,
            export_mesh: false,
            space: Space::World,
            uv_set_name: "VAT_UV".to_string(),
            force_uv: false,
            skip_first_frame: false,
            on_host_failure: FailurePolicy::default(),
        }
    }

    pub fn validate(&self) -> VatResult<()> {
        if self.mesh.is_empty() {
            return Err(VatError::config("mesh name must not be empty"));
        }
        if self.uv_set_name.is_empty() {
            return Err(VatError::config("uv set name must not be empty"));
        }
        if let (Some(start), Some(end)) = (self.frame_start, self.frame_end) {
            if start > end {
                return Err(VatError::config(format!(
                    "frame range {start}..{end} is inverted"
                )));
            }
        }
        Ok(())
    }
}

/// Everything a run produced, for logs and callers alike.
#[derive(Clone, Debug)]
pub struct EncodeReport {
    pub position_texture: PathBuf,
    pub normal_texture: Option<PathBuf>,
    pub metadata: PathBuf,
    pub exported_mesh: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub vertices: u32,
    /// Frames in the sampled span, before any skip.
    pub total_frames: u32,
    /// Rows actually written to the texture.
    pub texture_frames: u32,
    pub span: FrameSpan,
    pub space: Space,
    pub uv_outcome: Option<UvApplyOutcome>,
    pub warnings: Vec<String>,
}

/// Encode one mesh's animation into VAT artifacts. Sampling moves the
/// host's time cursor; it is restored before this returns, on success
/// and on failure alike.
#[tracing::instrument(skip(host), fields(mesh = %cfg.mesh))]
pub fn encode_vat<H>(cfg: &EncodeConfig, host: &mut H) -> VatResult<EncodeReport>
where
    H: SceneHost + ?Sized,
{
    cfg.validate()?;

    if !host.mesh_exists(&cfg.mesh) {
        return Err(VatError::config(format!(
            "mesh '{}' does not exist in the scene",
            cfg.mesh
        )));
    }

    let playback = host.playback_span();
    let span = FrameSpan::new(
        cfg.frame_start.unwrap_or(playback.start),
        cfg.frame_end.unwrap_or(playback.end),
    )?;
    let total_frames = span.total_frames();

    if cfg.skip_first_frame && total_frames < 2 {
        return Err(VatError::config(
            "skipping the first frame requires at least two frames",
        ));
    }
    let texture_frames = if cfg.skip_first_frame {
        total_frames - 1
    } else {
        total_frames
    };
    let vertices = host.vertex_count(&cfg.mesh)?;
    if vertices == 0 {
        return Err(VatError::config(format!(
            "mesh '{}' has no vertices",
            cfg.mesh
        )));
    }

    std::fs::create_dir_all(&cfg.output_dir).map_err(|e| {
        VatError::io(format!(
            "create output dir '{}': {e}",
            cfg.output_dir.display()
        ))
    })?;
    let base = sanitize_base_name(&cfg.mesh);
    let out_dir = cfg.output_dir.join(format!("{base}_vat"));
    std::fs::create_dir_all(&out_dir)
        .map_err(|e| VatError::io(format!("create output dir '{}': {e}", out_dir.display())))?;

    with_restored_cursor(host, |host| {
        let mut warnings = Vec::new();

        // Proxy pose. Every frame's delta is measured against it, so
        // the first texture row (or the skipped frame) is exactly zero.
        let proxy = host.positions(&cfg.mesh, span.start, cfg.space)?;

        let mut position_deltas: Vec<Vec<DVec3>> = Vec::with_capacity(total_frames as usize);
        let mut normal_frames: Vec<Vec<DVec3>> = Vec::new();
        for frame in span.frames() {
            let current = host.positions(&cfg.mesh, frame, cfg.space)?;
            if current.len() != proxy.len() {
                return Err(VatError::host(format!(
                    "vertex count changed mid-animation at frame {frame}: {} vs {}",
                    current.len(),
                    proxy.len()
                )));
            }
            position_deltas.push(
                current
                    .iter()
                    .zip(&proxy)
                    .map(|(c, p)| *c - *p)
                    .collect(),
            );
            if cfg.include_normals {
                let normals = host.normals(&cfg.mesh, frame)?;
                if normals.len() != proxy.len() {
                    return Err(VatError::host(format!(
                        "normal count changed mid-animation at frame {frame}: {} vs {}",
                        normals.len(),
                        proxy.len()
                    )));
                }
                normal_frames.push(normals);
            }
        }

        // The range scan covers every sampled frame, including a
        // skipped first frame's zero delta. The baseline therefore
        // always falls inside [min, max] and dequantized playback
        // starts from rest.
        let mut range = DeltaRange::empty();
        for frame in &position_deltas {
            range.observe_all(frame);
        }

        let texture_rows = if cfg.skip_first_frame {
            &position_deltas[1..]
        } else {
            &position_deltas[..]
        };

        let mut position_grid = RgbGrid::new(vertices as u32, texture_frames)?;
        for (row, frame) in texture_rows.iter().enumerate() {
            for (col, delta) in frame.iter().enumerate() {
                position_grid.put(
                    col as u32,
                    row as u32,
                    [
                        quantize_channel(delta.x, range.min.x, range.max.x),
                        quantize_channel(delta.y, range.min.y, range.max.y),
                        quantize_channel(delta.z, range.min.z, range.max.z),
                    ],
                );
            }
        }
        let position_texture = out_dir.join(format!("{base}_vat.png"));
        crate::png::write(&position_grid, &position_texture)?;
        tracing::info!(path = %position_texture.display(), "wrote position texture");

        let normal_texture = if cfg.include_normals {
            let normal_rows = if cfg.skip_first_frame {
                &normal_frames[1..]
            } else {
                &normal_frames[..]
            };
            let mut grid = RgbGrid::new(vertices as u32, texture_frames)?;
            for (row, frame) in normal_rows.iter().enumerate() {
                for (col, normal) in frame.iter().enumerate() {
                    // Negated X matches the handedness the decoder
                    // expects; the fixed [-1, 1] range needs no
                    // per-scene scan.
                    grid.put(
                        col as u32,
                        row as u32,
                        [
                            quantize_channel(-normal.x, -1.0, 1.0),
                            quantize_channel(normal.y, -1.0, 1.0),
                            quantize_channel(normal.z, -1.0, 1.0),
                        ],
                    );
                }
            }
            let path = out_dir.join(format!("{base}_vnrm.png"));
            crate::png::write(&grid, &path)?;
            tracing::info!(path = %path.display(), "wrote normal texture");
            Some(path)
        } else {
            None
        };

        let meta = VatMetadata {
            position: PositionBlock {
                min: range.min.to_array(),
                max: range.max.to_array(),
                frames: texture_frames,
                vertices: vertices as u32,
                space: cfg.space,
            },
            normal: cfg.include_normals.then(NormalBlock::unit),
        };
        let metadata = out_dir.join(format!("{base}_remap.json"));
        crate::meta::write_json(&meta, &metadata)?;

        let layout = UvLayout::plan(vertices, texture_frames)?;
        let mut uv_outcome = None;
        let mut exported_mesh = None;

        // Mutation steps need the mesh posed at the span start so the
        // export captures the proxy pose.
        host.set_frame(span.start)?;
        if let Some(writer) = host.writer() {
            match writer.apply_uv_layout(&cfg.mesh, &cfg.uv_set_name, &layout, cfg.force_uv) {
                Ok(outcome) => uv_outcome = Some(outcome),
                Err(e) => match cfg.on_host_failure {
                    FailurePolicy::Strict => return Err(e),
                    FailurePolicy::BestEffort => {
                        warnings.push(format!("uv layout not applied: {e}"));
                    }
                },
            }

            if cfg.export_mesh {
                let mesh_path = out_dir.join(format!("{base}.obj"));
                match writer.export_mesh(&cfg.mesh, &mesh_path, &cfg.uv_set_name) {
                    Ok(path) => exported_mesh = Some(path),
                    Err(e) => match cfg.on_host_failure {
                        FailurePolicy::Strict => return Err(e),
                        FailurePolicy::BestEffort => {
                            warnings.push(format!("mesh export failed: {e}"));
                        }
                    },
                }
            }
        } else if cfg.export_mesh {
            let msg = "scene host cannot export meshes".to_string();
            match cfg.on_host_failure {
                FailurePolicy::Strict => return Err(VatError::host(msg)),
                FailurePolicy::BestEffort => warnings.push(msg),
            }
        }

        Ok(EncodeReport {
            position_texture,
            normal_texture,
            metadata,
            exported_mesh,
            width: vertices as u32,
            height: texture_frames,
            vertices: vertices as u32,
            total_frames,
            texture_frames,
            span,
            space: cfg.space,
            uv_outcome,
            warnings,
        })
    })
}

/// Host mesh names may carry namespace or path separators. Artifacts
/// keep a flat, filesystem-safe stem.
pub fn sanitize_base_name(mesh: &str) -> String {
    mesh.replace([':', '|'], "_")
}
