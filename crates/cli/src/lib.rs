use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use schemars::JsonSchema;
use serde::Serialize;
use signal_engine::{context, CaretState, DiskFs, EngineConfig, SignalEngine};
use signal_extractor::{catalog, ExtractionStrategy, SignalExtractor};
use signal_protocol::{
    serialize_json_pretty, Category, CursorContext, LayerDefinition, SignalRecord, Suggestion,
    SUGGESTION_SCHEMA_VERSION,
};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    print_stdout(&serialize_json_pretty(value)?)
}

#[derive(Parser)]
#[command(name = "signal-complete")]
#[command(about = "Signal prop discovery and completion for JSX components", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Engine config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extraction strategy (default: composed)
    #[arg(long, global = true, value_enum)]
    strategy: Option<StrategyFlag>,

    /// Extraction cache time-to-live in milliseconds
    #[arg(long, global = true)]
    ttl_ms: Option<u64>,

    /// Suggest catalog signals even when the component file is missing
    #[arg(long, global = true)]
    catalog_fallback: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum StrategyFlag {
    Plain,
    Composed,
    #[value(alias = "input_binding")]
    InputBinding,
    Documented,
}

impl StrategyFlag {
    const fn as_domain(self) -> ExtractionStrategy {
        match self {
            StrategyFlag::Plain => ExtractionStrategy::Plain,
            StrategyFlag::Composed => ExtractionStrategy::Composed,
            StrategyFlag::InputBinding => ExtractionStrategy::InputBinding,
            StrategyFlag::Documented => ExtractionStrategy::Documented,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum CatalogGroup {
    Tone,
    Size,
    Shape,
    Behavior,
    State,
    Layout,
    Script,
}

impl CatalogGroup {
    const fn as_domain(self) -> Category {
        match self {
            CatalogGroup::Tone => Category::Tone,
            CatalogGroup::Size => Category::Size,
            CatalogGroup::Shape => Category::Shape,
            CatalogGroup::Behavior => Category::Behavior,
            CatalogGroup::State => Category::State,
            CatalogGroup::Layout => Category::Layout,
            CatalogGroup::Script => Category::Script,
        }
    }
}

/// Buffer extensions whose markup can carry signal props
const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

#[derive(Subcommand)]
enum Commands {
    /// Extract signals from a component source file
    Scan(ScanArgs),

    /// Resolve a component name to its source file
    Locate(LocateArgs),

    /// Describe the caret position in a buffer
    Context(BufferArgs),

    /// Suggest signal props for the caret position in a buffer
    Complete(CompleteArgs),

    /// List the built-in signal catalog
    Catalog(CatalogArgs),

    /// Print the JSON schema of `complete` output
    Schema,
}

#[derive(Args)]
struct ScanArgs {
    /// Component source file
    file: PathBuf,

    /// Report layer definitions instead of signals
    #[arg(long)]
    layers: bool,
}

#[derive(Args)]
struct LocateArgs {
    /// Component name as written in markup, e.g. `Button`
    component: String,

    /// Search root, repeatable and tried in order (default: current directory)
    #[arg(long = "root")]
    roots: Vec<PathBuf>,
}

#[derive(Args)]
struct BufferArgs {
    /// Read the buffer from a file (default: stdin)
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Use this text as the buffer
    #[arg(long)]
    text: Option<String>,

    /// Caret byte offset (default: end of buffer)
    #[arg(long)]
    offset: Option<usize>,
}

#[derive(Args)]
struct CompleteArgs {
    #[command(flatten)]
    buffer: BufferArgs,

    /// Search root, repeatable and tried in order (default: current directory)
    #[arg(long = "root")]
    roots: Vec<PathBuf>,
}

#[derive(Args)]
struct CatalogArgs {
    /// Restrict to one group
    #[arg(long, value_enum)]
    category: Option<CatalogGroup>,
}

#[derive(Serialize)]
struct ScanOutput {
    file: PathBuf,
    strategy: ExtractionStrategy,
    signals: Vec<SignalRecord>,
}

#[derive(Serialize)]
struct LayersOutput {
    file: PathBuf,
    layers: Vec<LayerDefinition>,
}

#[derive(Serialize)]
struct LocateOutput {
    component: String,
    path: Option<PathBuf>,
}

#[derive(Serialize)]
struct ContextOutput {
    offset: usize,
    state: CaretState,
    eligible: bool,
    /// Element the caret is inside, or the element a trailing `/>` just closed
    component: Option<String>,
    #[serde(flatten)]
    context: CursorContext,
}

/// Output of `signal-complete complete`
#[derive(Serialize, JsonSchema)]
struct CompletionOutput {
    schema_version: u32,
    context: CursorContext,
    suggestions: Vec<Suggestion>,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Scan(args) => run_scan(args, &config)?,
        Commands::Locate(args) => run_locate(args, config).await?,
        Commands::Context(args) => run_context(&args)?,
        Commands::Complete(args) => run_complete(args, config).await?,
        Commands::Catalog(args) => run_catalog(&args)?,
        Commands::Schema => run_schema()?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.extractor.strategy = strategy.as_domain();
    }
    if let Some(ttl_ms) = cli.ttl_ms {
        config.cache_ttl_ms = ttl_ms;
    }
    if cli.catalog_fallback {
        config.catalog_fallback = true;
    }
    config.validate()?;
    Ok(config)
}

fn run_scan(args: ScanArgs, config: &EngineConfig) -> Result<()> {
    let extractor = SignalExtractor::new(config.extractor.clone())?;

    if args.layers {
        let content = fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        return print_json(&LayersOutput {
            layers: extractor.layers(&content),
            file: args.file,
        });
    }

    let signals = extractor
        .extract_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    log::info!(
        "Extracted {} signals from {} ({})",
        signals.len(),
        args.file.display(),
        extractor.strategy().as_str()
    );
    print_json(&ScanOutput {
        file: args.file,
        strategy: extractor.strategy(),
        signals,
    })
}

async fn run_locate(args: LocateArgs, config: EngineConfig) -> Result<()> {
    let roots = resolve_roots(args.roots)?;
    let engine = SignalEngine::new(config, Arc::new(DiskFs))?;
    let path = match engine.try_locate(&args.component, &roots).await {
        Ok(path) => Some(path),
        Err(err) if err.is_benign() => {
            log::warn!("{err}");
            None
        }
        Err(err) => return Err(err.into()),
    };
    print_json(&LocateOutput {
        component: args.component,
        path,
    })
}

fn run_context(args: &BufferArgs) -> Result<()> {
    let buffer = read_buffer(args)?;
    let prefix = context::prefix_at(&buffer, caret_offset(args, &buffer)?);
    let ctx = context::analyze(prefix);
    print_json(&ContextOutput {
        offset: prefix.len(),
        state: context::caret_state(prefix),
        eligible: ctx.is_eligible(),
        component: context::component_name(prefix),
        context: ctx,
    })
}

async fn run_complete(args: CompleteArgs, config: EngineConfig) -> Result<()> {
    let buffer = read_buffer(&args.buffer)?;
    let prefix = context::prefix_at(&buffer, caret_offset(&args.buffer, &buffer)?);

    if let Some(path) = args.buffer.file.as_deref().filter(|path| !is_script_source(path)) {
        log::debug!("Skipping completion for non-script buffer {}", path.display());
        return print_json(&CompletionOutput {
            schema_version: SUGGESTION_SCHEMA_VERSION,
            context: CursorContext::outside(),
            suggestions: Vec::new(),
        });
    }

    let roots = resolve_roots(args.roots)?;
    let engine = SignalEngine::new(config, Arc::new(DiskFs))?;

    let suggestions = engine.complete_prefix(prefix, &roots).await;
    print_json(&CompletionOutput {
        schema_version: SUGGESTION_SCHEMA_VERSION,
        context: context::analyze(prefix),
        suggestions,
    })
}

fn run_catalog(args: &CatalogArgs) -> Result<()> {
    let signals = match args.category {
        None => catalog::all_signals(),
        Some(group) => catalog::signals_in(group.as_domain()),
    };
    print_json(&signals)
}

fn run_schema() -> Result<()> {
    print_json(&schemars::schema_for!(CompletionOutput))
}

fn resolve_roots(roots: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if !roots.is_empty() {
        return Ok(roots);
    }
    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    Ok(vec![cwd])
}

fn is_script_source(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    SCRIPT_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

fn read_buffer(args: &BufferArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read buffer from stdin")?;
    Ok(buffer)
}

fn caret_offset(args: &BufferArgs, buffer: &str) -> Result<usize> {
    match args.offset {
        Some(offset) if offset > buffer.len() => bail!(
            "--offset {offset} is past the end of the buffer ({} bytes)",
            buffer.len()
        ),
        Some(offset) => Ok(offset),
        None => Ok(buffer.len()),
    }
}
