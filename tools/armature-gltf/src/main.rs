//! armature-gltf - inspect skinned glTF assets and evaluate their poses

use anyhow::{bail, Result};
use armature::{pack_bone_matrices, SkinnedModel};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "armature-gltf")]
#[command(about = "Skinned glTF import and pose evaluation")]
#[command(version)]
struct Cli {
    /// TOML file with import options (defaults when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print submeshes, bones, and animations of a glTF/GLB file
    Inspect {
        /// Input glTF/GLB file
        input: PathBuf,
    },

    /// Print the skinning matrices of one animation frame
    Pose {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Animation index (bind pose when the file has no animations)
        #[arg(short, long, default_value_t = 0)]
        animation: usize,

        /// Playback time in seconds, wrapped to the clip length
        #[arg(short, long, default_value_t = 0.0)]
        time: f32,

        /// Print packed 3x4 rows instead of full 4x4 matrices
        #[arg(long)]
        packed: bool,

        /// Also print the sampled local tracks of every animated bone
        #[arg(long)]
        channels: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let options = armature_gltf::load_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { input } => {
            let model = armature_gltf::import_gltf(&input, &options)?;
            inspect(&model);
        }

        Commands::Pose {
            input,
            animation,
            time,
            packed,
            channels,
        } => {
            let model = armature_gltf::import_gltf(&input, &options)?;
            let matrices = pose(&model, animation, time)?;

            if channels {
                print_channels(&model, animation, time);
            }

            if packed {
                for (bone, rows) in pack_bone_matrices(&matrices).iter().enumerate() {
                    tracing::info!("  [{}] {:?}", bone, rows.to_array());
                }
            } else {
                for (bone, matrix) in matrices.iter().enumerate() {
                    let name = model.bones.name(bone as u32).unwrap_or("?");
                    tracing::info!("  [{}] '{}': {:?}", bone, name, matrix.to_cols_array());
                }
            }
        }
    }

    Ok(())
}

fn inspect(model: &SkinnedModel) {
    tracing::info!(
        "{} vertices, {} indices in {} entries",
        model.geometry.vertex_count(),
        model.geometry.index_count(),
        model.entries.len()
    );
    for (i, entry) in model.entries.iter().enumerate() {
        tracing::info!(
            "  entry [{}]: material {}, vertices {:?}, indices {:?}",
            i,
            entry.material_index,
            entry.vertex_range(),
            entry.index_range()
        );
    }

    tracing::info!("{} bones:", model.bone_count());
    for id in model.skeleton.iter_depth_first() {
        let bone = model.skeleton.get(id);
        let parent = model
            .skeleton
            .parent_of(id)
            .map(|p| model.skeleton.get(p).name.as_str())
            .unwrap_or("-");
        tracing::info!("  [{}] '{}' (parent '{}')", bone.index, bone.name, parent);
    }

    tracing::info!("{} animations:", model.animations.len());
    for (i, animation) in model.animations.iter().enumerate() {
        tracing::info!(
            "  [{}] '{}': {:.2}s, {} animated bones",
            i,
            animation.name,
            animation.duration_seconds(),
            animation.bound_bone_count()
        );
    }
}

fn pose(model: &SkinnedModel, animation: usize, time: f32) -> Result<Vec<glam::Mat4>> {
    if model.bone_count() == 0 {
        bail!("Model has no bones");
    }
    if model.animations.is_empty() {
        tracing::info!("No animations, printing the bind pose");
        return Ok(model.bind_pose());
    }

    let Some(clip) = model.animations.get(animation) else {
        bail!(
            "Animation index {} out of range ({} animations)",
            animation,
            model.animations.len()
        );
    };
    tracing::info!("Animation '{}' at {:.3}s:", clip.name, time);
    Ok(model.evaluate_animation(clip, clip.ticks_at(time)))
}

fn print_channels(model: &SkinnedModel, animation: usize, time: f32) {
    let Some(clip) = model.animations.get(animation) else {
        return;
    };
    let Some(samples) = model.sample_channels(animation, clip.ticks_at(time)) else {
        return;
    };

    tracing::info!("{} animated bones:", samples.len());
    for sample in samples {
        let name = model.bones.name(sample.index).unwrap_or("?");
        tracing::info!("  [{}] '{}'", sample.index, name);
        if let Some(position) = sample.position {
            tracing::info!("    position {:?}", position.to_array());
        }
        if let Some(rotation) = sample.rotation {
            tracing::info!("    rotation {:?}", rotation.to_cols_array());
        }
        if let Some(scale) = sample.scale {
            tracing::info!("    scale {:?}", scale.to_array());
        }
    }
}
