use std::path::{Path, PathBuf};

use crate::{
    core::{DVec3, FrameSpan, Space},
    error::VatResult,
    uv::UvLayout,
};

/// The host's single current-time cursor, process-wide mutable state.
/// Samplers move it; the pipeline saves and restores it around a run.
pub trait TimeCursor {
    fn current_frame(&self) -> i32;
    fn set_frame(&mut self, frame: i32) -> VatResult<()>;
}

/// Read-only scene access for sampling. Implementations are free to
/// move their time cursor while answering a query, which is why the
/// pipeline wraps every run in [`with_restored_cursor`].
pub trait SceneReader: TimeCursor {
    fn mesh_exists(&self, mesh: &str) -> bool;

    fn vertex_count(&self, mesh: &str) -> VatResult<usize>;

    /// Per-vertex positions at `frame` in the requested space, in the
    /// mesh's stable vertex order.
    fn positions(&mut self, mesh: &str, frame: i32, space: Space) -> VatResult<Vec<DVec3>>;

    /// Per-vertex normals at `frame`, always in object space so their
    /// semantics stay independent of the mesh transform.
    fn normals(&mut self, mesh: &str, frame: i32) -> VatResult<Vec<DVec3>>;

    /// The host's active playback span, the default frame range.
    fn playback_span(&self) -> FrameSpan;
}

/// Outcome of applying a UV layout to a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UvApplyOutcome {
    Created,
    /// The UV set already existed and `force` was not requested.
    Skipped,
}

/// Optional scene-mutation collaborator. A pipeline run without one
/// still produces valid texture and metadata artifacts.
pub trait SceneWriter {
    fn apply_uv_layout(
        &mut self,
        mesh: &str,
        uv_set: &str,
        layout: &UvLayout,
        force: bool,
    ) -> VatResult<UvApplyOutcome>;

    /// Export the mesh as currently posed, carrying `uv_set` as its
    /// texture channel. Returns the written path.
    fn export_mesh(&mut self, mesh: &str, out_path: &Path, uv_set: &str) -> VatResult<PathBuf>;
}

/// A scene the pipeline can run against: always readable, optionally
/// writable. Hosts without mutation support keep the default `None`
/// and still yield valid texture and metadata artifacts.
pub trait SceneHost: SceneReader {
    fn writer(&mut self) -> Option<&mut dyn SceneWriter> {
        None
    }
}

/// Run `f` against the scene, restoring the time cursor on every exit
/// path. A restore failure after success surfaces as the run's error;
/// after a failure, `f`'s error wins.
pub fn with_restored_cursor<S, T>(
    scene: &mut S,
    f: impl FnOnce(&mut S) -> VatResult<T>,
) -> VatResult<T>
where
    S: SceneReader + ?Sized,
{
    let saved = scene.current_frame();
    let result = f(scene);
    match scene.set_frame(saved) {
        Ok(()) => result,
        Err(restore_err) => result.and(Err(restore_err)),
    }
}
