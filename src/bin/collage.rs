use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use collage::{
    CanvasSettingsInput, Collage, DEFAULT_PREVIEW_WIDTH, Pos, Size, SourceLoader, Template,
    TemplateStore, TileEdit,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "collage", version)]
struct Cli {
    /// Template store used by `template` commands and `new --template`.
    #[arg(long, global = true, default_value = "templates.json")]
    templates: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a project from image files.
    New(NewArgs),
    /// Print the laid-out position of every tile.
    Layout(ProjectArg),
    /// Composite a project and write the image (PNG, JPEG or BMP by extension).
    Render(RenderArgs),
    /// Multiply the canvas size; a negative factor -n divides by n.
    Scale(ScaleArgs),
    /// Manage size templates.
    #[command(subcommand)]
    Template(TemplateCmd),
}

#[derive(Args, Debug)]
struct ProjectArg {
    /// Project JSON file.
    #[arg(long)]
    project: PathBuf,
}

#[derive(Args, Debug)]
struct CanvasArgs {
    #[arg(long, default_value = "1920")]
    width: String,
    #[arg(long, default_value = "1080")]
    height: String,
    #[arg(long, default_value = "20")]
    border: String,
    /// Background color as #RRGGBB.
    #[arg(long, default_value = "#000000")]
    bg: String,
    /// Corner radius for tiles that do not set their own.
    #[arg(long, default_value = "0")]
    radius: String,
}

impl CanvasArgs {
    fn to_input(&self) -> CanvasSettingsInput {
        CanvasSettingsInput {
            width: self.width.as_str().into(),
            height: self.height.as_str().into(),
            border: self.border.as_str().into(),
            bg_color: self.bg.clone(),
            corner_radius: self.radius.as_str().into(),
            scale: "1".into(),
        }
    }
}

#[derive(Args, Debug)]
struct NewArgs {
    /// Output project JSON.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    canvas: CanvasArgs,

    /// Target size for every image, WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size, default_value = "400x300")]
    size: Size,

    /// Apply a named template instead of --size.
    #[arg(long)]
    template: Option<String>,

    /// Image files, in paint order.
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    project: ProjectArg,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Also write a downscaled preview next to the output.
    #[arg(long, default_value_t = false)]
    preview: bool,
}

#[derive(Args, Debug)]
struct ScaleArgs {
    #[command(flatten)]
    project: ProjectArg,

    #[arg(long, allow_negative_numbers = true)]
    factor: f64,
}

#[derive(Subcommand, Debug)]
enum TemplateCmd {
    /// List stored templates.
    List,
    /// Add or replace a template.
    Add {
        name: String,
        #[arg(value_parser = parse_size)]
        size: Size,
        #[arg(long, default_value_t = 0)]
        radius: u32,
        /// Update tiles tagged with this template in a project.
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Remove a template.
    Remove { name: String },
    /// Apply a template to one tile, or re-sync every tile tagged with it.
    Apply {
        name: String,
        #[arg(long)]
        project: PathBuf,
        /// Tile index; omit to update all tagged tiles.
        #[arg(long)]
        index: Option<usize>,
    },
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got \"{s}\""))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("width: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("height: {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("width and height must be > 0, got \"{s}\""));
    }
    Ok(Size::new(w, h))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::New(args) => cmd_new(args, &cli.templates),
        Command::Layout(args) => cmd_layout(args),
        Command::Render(args) => cmd_render(args),
        Command::Scale(args) => cmd_scale(args),
        Command::Template(cmd) => cmd_template(cmd, &cli.templates),
    }
}

fn cmd_new(args: NewArgs, templates_path: &Path) -> anyhow::Result<()> {
    let mut collage = Collage::default();
    collage.set_settings(&args.canvas.to_input())?;

    let template = match &args.template {
        Some(name) => {
            let store = TemplateStore::load(templates_path)?;
            Some((name.clone(), *store.resolve(name)?))
        }
        None => None,
    };

    for path in &args.images {
        let idx = collage
            .add_image(path, TileEdit::sized(args.size.width, args.size.height))
            .with_context(|| format!("add image '{}'", path.display()))?;
        if let Some((name, t)) = &template {
            collage.apply_template(idx, name, t)?;
        }
    }

    collage::save_project(&collage, &args.out)?;
    eprintln!("wrote {} ({} tiles)", args.out.display(), collage.len());
    Ok(())
}

fn cmd_layout(args: ProjectArg) -> anyhow::Result<()> {
    let mut collage = collage::load_project(&args.project)?;
    collage.recalc_layout()?;
    for (idx, tile) in collage.tiles().iter().enumerate() {
        let pos = tile
            .effective_position()
            .map_or_else(|| "-".to_string(), |p: Pos| p.to_string());
        println!(
            "{idx}\t{}\torig {}\ttarget {}\tpos {pos}\tlocked {}",
            tile.filename(),
            tile.original_size(),
            tile.target_size,
            tile.locked
        );
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut collage = collage::load_project(&args.project.project)?;
    let (img, report) = collage.build_collage_with_report(&mut SourceLoader)?;
    collage::export_image(&img, &args.out)?;
    if args.preview {
        let preview = collage::preview_image(&img, DEFAULT_PREVIEW_WIDTH);
        let stem = args
            .out
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collage".to_string());
        let preview_path = args.out.with_file_name(format!("{stem}.preview.png"));
        collage::export_image(&preview, &preview_path)?;
    }
    eprintln!(
        "wrote {} ({} painted, {} clipped, {} failed)",
        args.out.display(),
        report.painted,
        report.clipped,
        report.load_failures
    );
    Ok(())
}

fn cmd_scale(args: ScaleArgs) -> anyhow::Result<()> {
    let path = &args.project.project;
    let mut collage = collage::load_project(path)?;
    collage.scale_canvas(args.factor)?;
    collage::save_project(&collage, path)?;
    let s = collage.settings();
    eprintln!("canvas is now {}x{}", s.width, s.height);
    Ok(())
}

fn cmd_template(cmd: TemplateCmd, templates_path: &Path) -> anyhow::Result<()> {
    let mut store = TemplateStore::load(templates_path)?;
    match cmd {
        TemplateCmd::List => {
            for (name, t) in store.iter() {
                println!("{name}: {}x{}, R:{}", t.width, t.height, t.corner_radius);
            }
        }
        TemplateCmd::Add {
            name,
            size,
            radius,
            project,
        } => {
            let template = Template::new(size.width, size.height, radius);
            store.insert(&name, template)?;
            store.save(templates_path)?;
            if let Some(project) = project {
                let mut collage = collage::load_project(&project)?;
                let updated = collage.sync_template(&name, &template)?;
                collage::save_project(&collage, &project)?;
                eprintln!("updated {updated} tiles with template '{name}'");
            }
        }
        TemplateCmd::Remove { name } => {
            if store.remove(&name).is_none() {
                anyhow::bail!("no template named '{name}'");
            }
            store.save(templates_path)?;
        }
        TemplateCmd::Apply {
            name,
            project,
            index,
        } => {
            let template = *store.resolve(&name)?;
            let mut collage = collage::load_project(&project)?;
            match index {
                Some(idx) => collage.apply_template(idx, &name, &template)?,
                None => {
                    let updated = collage.sync_template(&name, &template)?;
                    eprintln!("updated {updated} tiles with template '{name}'");
                }
            }
            collage::save_project(&collage, &project)?;
        }
    }
    Ok(())
}
