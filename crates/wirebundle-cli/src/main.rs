use serde::Serialize;
use std::path::{Path, PathBuf};
use wirebundle_core::{DescriptionLoader, LayoutConfig};
use wirebundle_render::{Assembly, SvgRenderOptions, render_assembly_svg};

const LOG_ENV: &str = "WIREBUNDLE_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(wirebundle_core::Error),
    Render(wirebundle_render::Error),
    Json(serde_json::Error),
    NoAssemblies(PathBuf),
    Failed { failed: usize, total: usize },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoAssemblies(dir) => {
                write!(f, "no assembly descriptions found in {}", dir.display())
            }
            CliError::Failed { failed, total } => {
                write!(f, "{failed} of {total} assemblies failed")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<wirebundle_core::Error> for CliError {
    fn from(value: wirebundle_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<wirebundle_render::Error> for CliError {
    fn from(value: wirebundle_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Layout,
}

#[derive(Debug)]
struct Args {
    command: Command,
    assets: PathBuf,
    out: PathBuf,
    config: Option<PathBuf>,
    debug_regions: bool,
    pretty: bool,
    inputs: Vec<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Render,
            assets: PathBuf::from("assets"),
            out: PathBuf::from("out"),
            config: None,
            debug_regions: false,
            pretty: false,
            inputs: Vec::new(),
        }
    }
}

fn usage() -> &'static str {
    "wirebundle-cli\n\
\n\
USAGE:\n\
  wirebundle-cli [render] [--assets <dir>] [--out <dir>] [--config <file.json5>] [--debug-regions] [<assembly.json5>...]\n\
  wirebundle-cli layout [--assets <dir>] [--config <file.json5>] [--pretty] <assembly.json5>\n\
\n\
NOTES:\n\
  - <assets> defaults to ./assets and must contain assemblies/, part_descriptions/ and parts/.\n\
  - Without assembly arguments, render processes every assemblies/*.json5.\n\
  - An assembly argument is a path or a file name inside assemblies/.\n\
  - render writes <out>/<assembly>.svg (default ./out) and keeps going when an assembly fails.\n\
  - layout prints the computed layout as JSON.\n\
  - Set WIREBUNDLE_LOG (e.g. debug) to see layout decisions on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "layout" => args.command = Command::Layout,
            "--debug-regions" => args.debug_regions = true,
            "--pretty" => args.pretty = true,
            "--assets" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.assets = PathBuf::from(dir);
            }
            "--out" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = PathBuf::from(dir);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(PathBuf::from(path));
            }
            "--" => args.inputs.extend(it.by_ref().cloned()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            input => args.inputs.push(input.to_string()),
        }
    }

    if matches!(args.command, Command::Layout) && args.inputs.len() != 1 {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    // A subscriber installed by an embedding process wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<LayoutConfig, CliError> {
    match path {
        Some(path) => Ok(LayoutConfig::load(path)?),
        None => Ok(LayoutConfig::default()),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn assembly_stem(input: &str) -> String {
    Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.to_string())
}

fn render_one(
    loader: &DescriptionLoader,
    input: &str,
    config: &LayoutConfig,
    options: &SvgRenderOptions,
    out_dir: &Path,
) -> Result<PathBuf, CliError> {
    let mut assembly = Assembly::load(loader, input, config)?;
    let layout = assembly.layout(config)?;
    let svg = render_assembly_svg(&assembly, &layout, options);

    let out = out_dir.join(format!("{}.svg", assembly_stem(input)));
    std::fs::write(&out, svg)?;
    Ok(out)
}

fn run_render(args: &Args, config: &LayoutConfig) -> Result<(), CliError> {
    let loader = DescriptionLoader::new(&args.assets);
    let inputs: Vec<String> = if args.inputs.is_empty() {
        loader
            .list_assemblies()?
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    } else {
        args.inputs.clone()
    };
    if inputs.is_empty() {
        return Err(CliError::NoAssemblies(loader.assemblies_dir()));
    }

    std::fs::create_dir_all(&args.out)?;
    let options = SvgRenderOptions {
        include_debug_regions: args.debug_regions,
    };

    let mut failed = 0usize;
    for input in &inputs {
        let name = assembly_stem(input);
        match render_one(&loader, input, config, &options, &args.out) {
            Ok(out) => println!("rendered {name} -> {}", out.display()),
            Err(err) => {
                failed += 1;
                tracing::debug!(assembly = %name, error = ?err, "assembly failed");
                eprintln!("error: {name}: {err}");
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Failed {
            failed,
            total: inputs.len(),
        });
    }
    Ok(())
}

fn run_layout(args: &Args, config: &LayoutConfig) -> Result<(), CliError> {
    let loader = DescriptionLoader::new(&args.assets);
    let Some(input) = args.inputs.first() else {
        return Err(CliError::Usage(usage()));
    };
    let mut assembly = Assembly::load(&loader, input, config)?;
    let layout = assembly.layout(config)?;
    write_json(&layout, args.pretty)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Render => run_render(&args, &config),
        Command::Layout => run_layout(&args, &config),
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
