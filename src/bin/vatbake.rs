use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "vatbake", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bake one mesh's animation into VAT textures and metadata.
    Encode(EncodeArgs),
    /// Print a scene's meshes, frame spans and vertex counts.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Mesh to bake.
    #[arg(long)]
    mesh: String,

    /// Output directory; artifacts land in a `<mesh>_vat` folder inside it.
    #[arg(long)]
    out: PathBuf,

    /// First frame (defaults to the scene's playback start).
    #[arg(long)]
    start: Option<i32>,

    /// Last frame, inclusive (defaults to the scene's playback end).
    #[arg(long)]
    end: Option<i32>,

    /// Sampling space for positions.
    #[arg(long, value_enum, default_value_t = SpaceChoice::World)]
    space: SpaceChoice,

    /// Also bake an object-space normal texture.
    #[arg(long)]
    normals: bool,

    /// Export the mesh as an OBJ carrying the VAT UV set.
    #[arg(long)]
    export_mesh: bool,

    /// UV set name to write into the scene.
    #[arg(long, default_value = "VAT_UV")]
    uv_set: String,

    /// Overwrite the UV set if it already exists.
    #[arg(long)]
    force_uv: bool,

    /// Drop the first frame's all-zero row from the texture.
    #[arg(long)]
    skip_first_frame: bool,

    /// Abort on host failures instead of recording warnings.
    #[arg(long)]
    strict: bool,

    /// Write the updated scene (with the new UV set) back to this path.
    #[arg(long)]
    save_scene: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SpaceChoice {
    World,
    Object,
}

impl From<SpaceChoice> for vatbake::Space {
    fn from(choice: SpaceChoice) -> Self {
        match choice {
            SpaceChoice::World => vatbake::Space::World,
            SpaceChoice::Object => vatbake::Space::Object,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Encode(args) => cmd_encode(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let mut scene = vatbake::SceneDoc::load(&args.in_path)
        .with_context(|| format!("load scene '{}'", args.in_path.display()))?;

    let mut cfg = vatbake::EncodeConfig::new(&args.mesh, &args.out);
    cfg.frame_start = args.start;
    cfg.frame_end = args.end;
    cfg.space = args.space.into();
    cfg.include_normals = args.normals;
    cfg.export_mesh = args.export_mesh;
    cfg.uv_set_name = args.uv_set;
    cfg.force_uv = args.force_uv;
    cfg.skip_first_frame = args.skip_first_frame;
    cfg.on_host_failure = if args.strict {
        vatbake::FailurePolicy::Strict
    } else {
        vatbake::FailurePolicy::BestEffort
    };

    let report = vatbake::encode_vat(&cfg, &mut scene)?;

    if let Some(path) = args.save_scene {
        scene
            .save(&path)
            .with_context(|| format!("save scene '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!(
        "baked {} frames x {} vertices ({} space, frames {}..={})",
        report.texture_frames,
        report.vertices,
        report.space.as_str(),
        report.span.start,
        report.span.end
    );
    eprintln!("wrote {}", report.position_texture.display());
    if let Some(path) = &report.normal_texture {
        eprintln!("wrote {}", path.display());
    }
    eprintln!("wrote {}", report.metadata.display());
    if let Some(path) = &report.exported_mesh {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let scene = vatbake::SceneDoc::load(&args.in_path)
        .with_context(|| format!("load scene '{}'", args.in_path.display()))?;

    let span = scene.playback;
    println!("playback: {}..={}", span.start, span.end);
    for (name, mesh) in &scene.meshes {
        let frames: Vec<i32> = mesh.frames.keys().copied().collect();
        let first = frames.first().copied().unwrap_or(span.start);
        let last = frames.last().copied().unwrap_or(span.end);
        println!(
            "{name}: {} vertices, {} triangles, frames {first}..={last}, uv sets [{}]",
            mesh.vertex_count(),
            mesh.triangles.len(),
            mesh.uv_sets
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}
