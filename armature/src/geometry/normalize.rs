//! Attribute normalization
//!
//! Fills in the streams that a submesh is missing so that every submesh
//! entering [`super::merge`] carries the same attribute set.

use glam::{Vec2, Vec3};

use super::types::MeshGeometry;
use crate::config::ImportOptions;

const UV_DETERMINANT_EPSILON: f32 = 1e-8;

/// Apply every enabled normalization step to one submesh
pub fn normalize_submesh(geometry: &mut MeshGeometry, options: &ImportOptions) {
    fill_texcoords(geometry);
    if options.generate_normals && !geometry.has_normals() {
        generate_normals(geometry);
    }
    if options.generate_tangents && !geometry.has_tangents() && geometry.has_normals() {
        generate_tangents(geometry);
    }
}

/// Default missing texture coordinates to (0, 0)
pub fn fill_texcoords(geometry: &mut MeshGeometry) {
    if geometry.texcoords.is_none() {
        geometry.texcoords = Some(vec![Vec2::ZERO; geometry.vertex_count()]);
    }
}

/// Area-weighted smooth vertex normals from the triangle list.
///
/// Vertices not referenced by any non-degenerate triangle get +Y.
pub fn generate_normals(geometry: &mut MeshGeometry) {
    let positions = &geometry.positions;
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for &[a, b, c] in &geometry.faces {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        // Unnormalized cross product weights by triangle area
        let face_normal = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        accum[a] += face_normal;
        accum[b] += face_normal;
        accum[c] += face_normal;
    }

    geometry.normals = Some(
        accum
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect(),
    );
}

/// Per-vertex tangents derived from texture coordinates.
///
/// Requires normals; does nothing without them. Triangles with degenerate UV
/// mapping are skipped, and vertices left without a usable tangent get an
/// arbitrary axis perpendicular to their normal.
pub fn generate_tangents(geometry: &mut MeshGeometry) {
    let Some(normals) = geometry.normals.as_ref() else {
        return;
    };
    let positions = &geometry.positions;
    let uvs = geometry.texcoords.as_deref();
    let mut accum = vec![Vec3::ZERO; positions.len()];

    if let Some(uvs) = uvs {
        for &[a, b, c] in &geometry.faces {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let e1 = positions[b] - positions[a];
            let e2 = positions[c] - positions[a];
            let duv1 = uvs[b] - uvs[a];
            let duv2 = uvs[c] - uvs[a];

            let det = duv1.x * duv2.y - duv2.x * duv1.y;
            if det.abs() < UV_DETERMINANT_EPSILON {
                continue;
            }
            let tangent = (e1 * duv2.y - e2 * duv1.y) / det;
            accum[a] += tangent;
            accum[b] += tangent;
            accum[c] += tangent;
        }
    }

    let tangents: Vec<Vec3> = accum
        .into_iter()
        .zip(normals)
        .map(|(t, &n)| {
            // Gram-Schmidt against the normal
            (t - n * n.dot(t))
                .try_normalize()
                .unwrap_or_else(|| n.any_orthonormal_vector())
        })
        .collect();
    geometry.tangents = Some(tangents);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit quad in the XY plane, UVs aligned with X/Y
    fn quad() -> MeshGeometry {
        MeshGeometry {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            texcoords: Some(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
            ]),
            indices: vec![0, 1, 2, 2, 1, 3],
            faces: vec![[0, 1, 2], [2, 1, 3]],
            ..Default::default()
        }
    }

    #[test]
    fn test_fill_texcoords() {
        let mut mesh = quad();
        mesh.texcoords = None;
        fill_texcoords(&mut mesh);
        assert_eq!(mesh.texcoords.as_ref().unwrap(), &vec![Vec2::ZERO; 4]);
    }

    #[test]
    fn test_fill_texcoords_keeps_existing() {
        let mut mesh = quad();
        fill_texcoords(&mut mesh);
        assert_eq!(mesh.texcoords.as_ref().unwrap()[3], Vec2::ONE);
    }

    #[test]
    fn test_generated_normals_face_counter_clockwise_side() {
        let mut mesh = quad();
        generate_normals(&mut mesh);
        for n in mesh.normals.as_ref().unwrap() {
            assert!(n.abs_diff_eq(Vec3::Z, 1e-6), "normal {:?}", n);
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_up_normal() {
        let mut mesh = quad();
        mesh.positions.push(Vec3::splat(5.0));
        generate_normals(&mut mesh);
        assert_eq!(mesh.normals.as_ref().unwrap()[4], Vec3::Y);
    }

    #[test]
    fn test_generated_tangents_follow_u_axis() {
        let mut mesh = quad();
        generate_normals(&mut mesh);
        generate_tangents(&mut mesh);
        for t in mesh.tangents.as_ref().unwrap() {
            assert!(t.abs_diff_eq(Vec3::X, 1e-6), "tangent {:?}", t);
        }
    }

    #[test]
    fn test_degenerate_uvs_still_give_perpendicular_tangents() {
        let mut mesh = quad();
        mesh.texcoords = Some(vec![Vec2::ZERO; 4]);
        generate_normals(&mut mesh);
        generate_tangents(&mut mesh);
        let normals = mesh.normals.as_ref().unwrap();
        for (t, n) in mesh.tangents.as_ref().unwrap().iter().zip(normals) {
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!(t.dot(*n).abs() < 1e-5);
        }
    }

    #[test]
    fn test_tangents_need_normals() {
        let mut mesh = quad();
        generate_tangents(&mut mesh);
        assert!(mesh.tangents.is_none());
    }

    #[test]
    fn test_normalize_respects_options() {
        let mut mesh = quad();
        mesh.texcoords = None;
        let options = ImportOptions {
            generate_normals: false,
            ..Default::default()
        };
        normalize_submesh(&mut mesh, &options);
        assert!(mesh.has_texcoords());
        assert!(!mesh.has_normals());
        assert!(!mesh.has_tangents());

        normalize_submesh(&mut mesh, &ImportOptions::default());
        assert!(mesh.has_normals());
        assert!(mesh.has_tangents());
        assert!(mesh.is_consistent());
    }
}
