use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use engine::geometry::{ScrollOffset, Viewport};
use engine::raster::{Palette, frame_hash};
use engine::resize::ResizeListeners;
use tracing_subscriber::EnvFilter;

use skilltree::layout::TieredLayout;
use skilltree::settings::{SettingsStore, TreeSettings};
use skilltree::skill::{default_skills, load_skills};
use skilltree::{MemoryStore, Skill, SkillId, SkillStore, SkillTree, SkillTreeSegment};

#[derive(Debug, Parser)]
#[command(name = "skilltree")]
#[command(about = "Headless skill tree: unlock propagation, layout measurement and rendering")]
struct Cli {
    /// Skill data (JSON). Defaults to the bundled sample forest.
    #[arg(long, global = true)]
    skills: Option<PathBuf>,
    /// Node state snapshot (JSON). Created on first write.
    #[arg(long, global = true, default_value = "skilltree-state.json")]
    state: PathBuf,
    /// Settings file. Defaults to $SKILLTREE_SETTINGS_PATH or the user config dir.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every node with its current state.
    Show,
    /// Select or deselect nodes, then propagate and save the state.
    Toggle {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Rasterise the tree to a PNG and print the frame hash.
    Render {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 640)]
        width: u32,
        #[arg(long, default_value_t = 480)]
        height: u32,
        #[arg(long, default_value_t = 0.0)]
        scroll_x: f32,
        #[arg(long, default_value_t = 0.0)]
        scroll_y: f32,
    },
    /// Simulate a burst of window resizes and report how often nodes were re-measured.
    Resize {
        #[arg(long, default_value_t = 1024)]
        width: u32,
        #[arg(long, default_value_t = 768)]
        height: u32,
        #[arg(long, default_value_t = 10)]
        events: u32,
        #[arg(long, default_value_t = 50)]
        spacing_ms: u64,
    },
}

struct Session {
    skills: Vec<Skill>,
    settings: TreeSettings,
    tree: SkillTree,
    store: MemoryStore,
    state_path: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut session = open_session(&cli)?;

    match cli.command {
        Commands::Show => cmd_show(&session),
        Commands::Toggle { ids } => cmd_toggle(&mut session, &ids),
        Commands::Render {
            out,
            width,
            height,
            scroll_x,
            scroll_y,
        } => cmd_render(
            &mut session,
            &out,
            width,
            height,
            ScrollOffset::new(scroll_x, scroll_y),
        ),
        Commands::Resize {
            width,
            height,
            events,
            spacing_ms,
        } => cmd_resize(&mut session, width, height, events, spacing_ms),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_session(cli: &Cli) -> Result<Session> {
    let skills = match &cli.skills {
        Some(path) => load_skills(path)
            .with_context(|| format!("failed to load skills from {}", path.display()))?,
        None => default_skills(),
    };
    if skills.is_empty() {
        bail!("no skills to show");
    }

    let settings_store = match &cli.settings {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::from_env(),
    };
    let settings = settings_store.load();
    tracing::info!(path = %settings_store.path().display(), "settings loaded");

    let store = MemoryStore::load_or_default(&cli.state)
        .with_context(|| format!("failed to read state from {}", cli.state.display()))?;
    let tree = SkillTree::new(&skills, &settings);

    let mut session = Session {
        skills,
        settings,
        tree,
        store,
        state_path: cli.state.clone(),
    };
    let changed = session.tree.settle(&mut session.store);
    tracing::info!(changed, "initial state synchronized");
    Ok(session)
}

fn cmd_show(session: &Session) -> Result<()> {
    for root in session.tree.roots() {
        print_segment(root, &session.store, 0);
    }
    println!("selected: {}", session.store.selected_count());
    Ok(())
}

fn print_segment(seg: &SkillTreeSegment, store: &MemoryStore, depth: usize) {
    println!(
        "{:indent$}{} ({}) [{}]",
        "",
        seg.title(),
        seg.id(),
        store.get(seg.id()).as_str(),
        indent = depth * 2
    );
    for child in seg.children() {
        print_segment(child, store, depth + 1);
    }
}

fn cmd_toggle(session: &mut Session, ids: &[String]) -> Result<()> {
    for raw in ids {
        let id = SkillId::new(raw.as_str());
        let changed = session
            .tree
            .toggle(&mut session.store, &id)
            .with_context(|| format!("cannot toggle {raw}"))?;
        let state = session.store.get(&id);
        if changed {
            println!("{id}: {}", state.as_str());
        } else {
            println!("{id}: {} (locked nodes cannot be selected)", state.as_str());
        }
    }
    session
        .store
        .save(&session.state_path)
        .with_context(|| format!("failed to save state to {}", session.state_path.display()))?;
    println!("selected: {}", session.store.selected_count());
    Ok(())
}

/// Largest canvas side the renderer will allocate.
const MAX_RENDER_SIDE: u32 = 8192;

fn check_render_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("render size must be non-zero");
    }
    if width > MAX_RENDER_SIDE || height > MAX_RENDER_SIDE {
        bail!("render size {width}x{height} exceeds the {MAX_RENDER_SIDE}px limit");
    }
    Ok(())
}

fn cmd_render(
    session: &mut Session,
    out: &Path,
    width: u32,
    height: u32,
    scroll: ScrollOffset,
) -> Result<()> {
    check_render_size(width, height)?;
    let viewport = Viewport::new(width as f32, height as f32).with_scroll(scroll);
    let layout = TieredLayout::new(&session.skills, session.settings.layout, viewport);
    let mut listeners = ResizeListeners::new();
    session.tree.mount(&mut listeners, &layout)?;

    let canvas = session
        .tree
        .rasterize(&session.store, width, height, &Palette::default());
    write_png_rgba(out, width, height, canvas.frame())?;
    session.tree.unmount(&mut listeners);

    println!("wrote {}", out.display());
    println!("sha256 {}", frame_hash(canvas.frame()));
    Ok(())
}

fn cmd_resize(
    session: &mut Session,
    width: u32,
    height: u32,
    events: u32,
    spacing_ms: u64,
) -> Result<()> {
    let viewport = Viewport::new(width as f32, height as f32);
    let mut layout = TieredLayout::new(&session.skills, session.settings.layout, viewport);
    let mut listeners = ResizeListeners::new();
    session.tree.mount(&mut listeners, &layout)?;

    let start = Instant::now();
    let spacing = Duration::from_millis(spacing_ms);
    let mut measured = 0;
    let mut at = start;
    for i in 0..events {
        at = start + spacing * i;
        layout.resize(width as f32 + i as f32, height as f32);
        measured += session.tree.handle_resize(&mut listeners, &layout, at)?;
    }
    measured += session
        .tree
        .flush_resize(&mut listeners, &layout, at + session.settings.resize.throttle)?;

    let released = session.tree.unmount(&mut listeners);
    println!(
        "{events} resize events over {}ms -> {measured} node measurements ({} nodes, throttle {}ms)",
        spacing_ms * u64::from(events.saturating_sub(1)),
        session.tree.segments().len(),
        session.settings.resize.throttle.as_millis()
    );
    println!("released {released} listeners, {} remaining", listeners.len());
    Ok(())
}

fn write_png_rgba(path: &Path, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create png at {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .with_context(|| format!("failed to write png header at {}", path.display()))?;
    writer
        .write_image_data(rgba)
        .with_context(|| format!("failed to write png data at {}", path.display()))?;
    Ok(())
}
