use std::{fmt::Write as _, path::Path};

use crate::{
    core::DVec3,
    error::{VatError, VatResult},
};

/// Write a Wavefront OBJ carrying one `vt` channel. Positions and UVs
/// are parallel per-vertex arrays; faces index both with the same
/// (1-based) index. The whole file is assembled in memory and written
/// once, so a failure leaves no partial output.
pub fn write_obj(
    path: &Path,
    positions: &[DVec3],
    uvs: &[[f64; 2]],
    triangles: &[[u32; 3]],
) -> VatResult<()> {
    if positions.is_empty() {
        return Err(VatError::host("cannot export a mesh with no vertices"));
    }
    if uvs.len() != positions.len() {
        return Err(VatError::host(format!(
            "uv count {} does not match vertex count {}",
            uvs.len(),
            positions.len()
        )));
    }
    if triangles.is_empty() {
        return Err(VatError::host("cannot export a mesh with no triangles"));
    }
    for tri in triangles {
        for &idx in tri {
            if idx as usize >= positions.len() {
                return Err(VatError::host(format!(
                    "triangle index {idx} is out of bounds for {} vertices",
                    positions.len()
                )));
            }
        }
    }

    let mut out = String::with_capacity(positions.len() * 48 + triangles.len() * 24);
    for p in positions {
        let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
    }
    for uv in uvs {
        let _ = writeln!(out, "vt {} {}", uv[0], uv[1]);
    }
    for tri in triangles {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        let _ = writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}");
    }

    std::fs::write(path, out)
        .map_err(|e| VatError::io(format!("write obj '{}': {e}", path.display())))
}
