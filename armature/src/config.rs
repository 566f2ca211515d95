//! Import configuration

use serde::{Deserialize, Serialize};

use crate::animation::RotationInterpolation;

/// Tick rate assumed for clips that report 0 ticks per second
pub const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

/// Options controlling [`crate::import_scene`].
///
/// Deserializable so front ends can load it from a config file; every field
/// falls back to its default when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// How rotation keys are blended during pose evaluation
    pub rotation_interpolation: RotationInterpolation,
    /// Compute smooth normals for submeshes that have none
    pub generate_normals: bool,
    /// Compute tangents for submeshes that have none (requires normals)
    pub generate_tangents: bool,
    /// Used when a clip reports 0 ticks per second
    pub default_ticks_per_second: f32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            rotation_interpolation: RotationInterpolation::default(),
            generate_normals: true,
            generate_tangents: true,
            default_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ImportOptions::default();
        assert_eq!(
            options.rotation_interpolation,
            RotationInterpolation::LinearMatrixBlend
        );
        assert!(options.generate_normals);
        assert!(options.generate_tangents);
        assert_eq!(options.default_ticks_per_second, 25.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let options: ImportOptions =
            serde_json::from_str(r#"{ "rotation_interpolation": "slerp" }"#).unwrap();
        assert_eq!(options.rotation_interpolation, RotationInterpolation::Slerp);
        assert!(options.generate_normals);
        assert_eq!(options.default_ticks_per_second, DEFAULT_TICKS_PER_SECOND);
    }

    #[test]
    fn test_empty_config() {
        let options: ImportOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ImportOptions::default());
    }
}
