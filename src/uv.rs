use crate::error::{VatError, VatResult};

/// Per-vertex texture coordinates addressing the vertex's own column
/// and the center of the first texture row (the proxy/base row).
#[derive(Clone, Debug, PartialEq)]
pub struct UvLayout {
    coords: Vec<[f64; 2]>,
}

impl UvLayout {
    /// For `vertex_count` columns and `frame_count` rows, vertex `i`
    /// gets `u = (i + 0.5) / vertex_count`, `v = 0.5 / frame_count`.
    pub fn plan(vertex_count: usize, frame_count: u32) -> VatResult<Self> {
        if vertex_count == 0 {
            return Err(VatError::config("uv layout requires at least one vertex"));
        }
        if frame_count == 0 {
            return Err(VatError::config("uv layout requires at least one frame"));
        }

        let pixel_size_u = 1.0 / vertex_count as f64;
        let pixel_size_v = 1.0 / f64::from(frame_count);
        let v = 0.5 * pixel_size_v;

        let coords = (0..vertex_count)
            .map(|i| [(i as f64 + 0.5) * pixel_size_u, v])
            .collect();

        Ok(Self { coords })
    }

    pub fn coords(&self) -> &[[f64; 2]] {
        &self.coords
    }

    pub fn vertex_count(&self) -> usize {
        self.coords.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_counts() {
        assert!(UvLayout::plan(0, 4).is_err());
        assert!(UvLayout::plan(4, 0).is_err());
    }

    #[test]
    fn u_values_are_increasing_evenly_spaced_and_open_interval() {
        let layout = UvLayout::plan(8, 3).unwrap();
        let coords = layout.coords();
        assert_eq!(coords.len(), 8);

        let spacing = 1.0 / 8.0;
        for (i, uv) in coords.iter().enumerate() {
            assert!(uv[0] > 0.0 && uv[0] < 1.0);
            assert!((uv[0] - (i as f64 + 0.5) * spacing).abs() < 1e-12);
            if i > 0 {
                let gap = uv[0] - coords[i - 1][0];
                assert!((gap - spacing).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn v_is_the_center_of_row_zero_for_all_vertices() {
        let layout = UvLayout::plan(5, 4).unwrap();
        for uv in layout.coords() {
            assert_eq!(uv[1], 0.5 / 4.0);
        }
    }

    #[test]
    fn single_vertex_single_frame_sits_at_texture_center() {
        let layout = UvLayout::plan(1, 1).unwrap();
        assert_eq!(layout.coords(), &[[0.5, 0.5]]);
    }
}
