use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "vnframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene as a PNG.
    Frame(FrameArgs),
    /// Print the dialogue text ops of a scene as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Asset root for images and fonts (defaults to the scene's directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Localization table JSON (defaults to the built-in table).
    #[arg(long)]
    localization: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the scaled preview to this path.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    scene: SceneArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args).await,
        Command::Layout(args) => cmd_layout(args).await,
    }
}

struct Loaded {
    scene: vnframe::SceneDef,
    localization: vnframe::Localization,
    loader: vnframe::FsAssetLoader,
}

fn load_scene(args: &SceneArgs) -> anyhow::Result<Loaded> {
    let scene = vnframe::SceneDef::from_path(&args.in_path)
        .with_context(|| format!("load scene '{}'", args.in_path.display()))?;
    let localization = match &args.localization {
        Some(p) => vnframe::Localization::from_path(p)
            .with_context(|| format!("load localization '{}'", p.display()))?,
        None => vnframe::Localization::builtin(),
    };
    let root = match &args.assets {
        Some(r) => r.clone(),
        None => args
            .in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    Ok(Loaded {
        scene,
        localization,
        loader: vnframe::FsAssetLoader::new(root),
    })
}

async fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let Loaded {
        scene,
        localization,
        loader,
    } = load_scene(&args.scene)?;

    let session = scene.build_session(localization, &loader).await?;
    let lang = session.form().language;
    if session.composer().load_fonts(&loader, &[lang]).await == 0 {
        eprintln!("warning: no font for '{}'; text will not be drawn", lang.code());
    }

    let out = session
        .render(&loader)
        .await?
        .rendered()
        .context("compose pass was dropped")?;

    vnframe::save_png(&args.out, &out.frame)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(path) = &args.preview {
        vnframe::save_png(path, &out.preview)
            .with_context(|| format!("write preview '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

async fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let Loaded {
        scene,
        localization,
        loader,
    } = load_scene(&args.scene)?;

    let form = &scene.form;
    let family = form.language.font_family(&scene.opts.family_prefix);
    let mut fonts = vnframe::FontBook::new();
    match vnframe::AssetLoader::load_bytes(&loader, &format!("fonts/{family}.ttf")).await {
        Ok(bytes) => fonts.register(family.clone(), bytes)?,
        Err(e) => eprintln!("warning: {e}; using monospace metrics"),
    }

    let props = localization.get(form.language)?;
    let ops = vnframe::layout_dialogue(&mut fonts, props, scene.opts.canvas, &family, form)?;
    let text: Vec<&vnframe::TextOp> = ops
        .iter()
        .filter_map(|op| match op {
            vnframe::DrawOp::Text(t) => Some(t),
            _ => None,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&text)?);
    Ok(())
}
