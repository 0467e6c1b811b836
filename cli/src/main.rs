use clap::{Parser, Subcommand, ValueEnum};
use edgeline_cli::commands;
use edgeline_cli::logging;
use edgeline_cli::readline;
use edgeline_cli::CliContext;
use edgeline_types::Edge;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let ctx = CliContext::new();

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.overlay.lock().await.detach();
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "edge-gesture indicator playground")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EdgeArg {
    Left,
    Right,
}

impl From<EdgeArg> for Edge {
    fn from(edge: EdgeArg) -> Self {
        match edge {
            EdgeArg::Left => Edge::Left,
            EdgeArg::Right => Edge::Right,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the overlay surface
    Attach,
    /// Remove the overlay surface
    Detach,
    /// Animate an edge to a pixel width (0 hides)
    Set {
        #[arg(short, long, value_enum)]
        edge: EdgeArg,
        #[arg(short, long, allow_hyphen_values = true)]
        width: i32,
    },
    /// Hide an edge after the hide delay
    Hide {
        #[arg(short, long, value_enum)]
        edge: EdgeArg,
    },
    /// Drag the sensitivity slider to a scale
    Scale {
        #[arg(short, long, value_enum)]
        edge: EdgeArg,
        #[arg(short, long)]
        scale: f32,
    },
    /// Snap the sensitivity slider to a preset stop
    Preset {
        #[arg(short, long, value_enum)]
        edge: EdgeArg,
        #[arg(short, long)]
        index: usize,
    },
    Presets,
    /// List connected monitors; `*` marks the one the overlay covers
    Monitors,
    Status,
    Config,
    SaveConfig,
    ReloadConfig,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "edgeline".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Attach) => commands::attach(ctx).await,
        Some(Commands::Detach) => commands::detach(ctx).await,
        Some(Commands::Set { edge, width }) => commands::set_width(ctx, edge.into(), width).await,
        Some(Commands::Hide { edge }) => commands::hide(ctx, edge.into()).await,
        Some(Commands::Scale { edge, scale }) => {
            commands::set_scale(ctx, edge.into(), scale).await?
        }
        Some(Commands::Preset { edge, index }) => {
            commands::apply_preset(ctx, edge.into(), index).await?
        }
        Some(Commands::Presets) => commands::list_presets(ctx).await,
        Some(Commands::Monitors) => commands::list_monitors(ctx).await,
        Some(Commands::Status) => commands::show_status(ctx).await,
        Some(Commands::Config) => commands::show_config(ctx).await,
        Some(Commands::SaveConfig) => commands::save_config(ctx).await?,
        Some(Commands::ReloadConfig) => commands::reload_config(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
