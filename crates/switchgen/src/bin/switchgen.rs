use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use std::io::Write;
use std::path::{Path, PathBuf};
use switchgen::cli::{
    Cli, Command, GenerateArgs, GeneratorArgs, GetterArg, InspectArgs, ScanScopeArg, TaskArgs,
};
use switchgen::codegen::{CodeGenerator, GeneratorOptions, GetterStyle};
use switchgen::config::{Config, OutputConfig};
use switchgen::inputs::resolve_inputs;
use switchgen::reader::{RuleReader, ScanScope};
use switchgen::task::GenerateSourceTask;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "SWITCHGEN_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        tracing::debug!("loaded config from {:?}", path);
    }

    match cli.command {
        Command::Generate(args) => generate(&config, args),
        Command::Inspect(args) => inspect(&config, args),
        Command::Task(args) => task(&config, args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "switchgen=debug" } else { "switchgen=info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI flags take precedence over the config file
fn options(config: &Config, args: &GeneratorArgs) -> GeneratorOptions {
    let mut options = config.generator;
    if let Some(scope) = args.scan_scope {
        options.scan_scope = match scope {
            ScanScopeArg::Document => ScanScope::Document,
            ScanScopeArg::Rule => ScanScope::Rule,
        };
    }
    if let Some(getters) = args.getters {
        options.getter_style = match getters {
            GetterArg::Typed => GetterStyle::Typed,
            GetterArg::Verbatim => GetterStyle::Verbatim,
        };
    }
    options
}

fn generate(config: &Config, args: GenerateArgs) -> Result<()> {
    let generator = CodeGenerator::new(options(config, &args.generator));

    let patterns = if args.inputs.is_empty() {
        &config.sources
    } else {
        &args.inputs
    };
    if patterns.is_empty() {
        return Err(miette!(
            help = "pass schema paths or add `source` entries to switchgen.kdl",
            "no input schemas given"
        ));
    }
    let inputs = resolve_inputs(patterns)?;
    tracing::debug!("resolved {} schema(s)", inputs.len());

    let out_dir = match (&args.out_dir, &args.output, &config.output) {
        (Some(dir), _, output) => Some((dir.clone(), extension(output.as_ref()))),
        (None, None, Some(output)) => Some((output.dir.clone(), output.extension.clone())),
        _ => None,
    };

    if let Some((dir, extension)) = out_dir {
        let written = generator.write_to_disk(&inputs, &dir, &extension)?;
        for file in &written {
            tracing::info!(
                "{} -> {} ({} accessors)",
                file.source.display(),
                file.output.display(),
                file.summary.total()
            );
        }
        println!("Generated {} file(s) in {:?}", written.len(), dir);
        return Ok(());
    }

    if let Some(output) = &args.output {
        let [input] = inputs.as_slice() else {
            return Err(miette!(
                help = "use --out-dir to generate several schemas at once",
                "--output takes exactly one schema, got {}",
                inputs.len()
            ));
        };
        return write_single(&generator, input, output);
    }

    let stdout = std::io::stdout();
    let mut sink = stdout.lock();
    for input in &inputs {
        generator.generate_file(input, &mut sink)?;
    }
    sink.flush().into_diagnostic()?;
    Ok(())
}

fn extension(output: Option<&OutputConfig>) -> String {
    output
        .map(|o| o.extension.clone())
        .unwrap_or_else(|| OutputConfig::default().extension)
}

fn write_single(generator: &CodeGenerator, input: &Path, output: &PathBuf) -> Result<()> {
    let mut buffer = Vec::new();
    generator.generate_file(input, &mut buffer)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    std::fs::write(output, buffer).into_diagnostic()?;
    println!("✨ Generated accessors to {:?}", output);
    Ok(())
}

fn inspect(config: &Config, args: InspectArgs) -> Result<()> {
    let options = options(config, &args.generator);
    let text = std::fs::read_to_string(&args.input).into_diagnostic()?;

    let schema = RuleReader::from_text(&text)
        .with_origin(&args.input)
        .with_scope(options.scan_scope)
        .read_schema()
        .map_err(|e| e.with_source_text(text.as_str()))?;
    if schema.is_none() {
        tracing::warn!("no Rule element in {}", args.input.display());
    }

    let json = serde_json::to_string_pretty(&schema).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn task(config: &Config, args: TaskArgs) -> Result<()> {
    let task = GenerateSourceTask::new(&args.source).with_options(options(config, &args.generator));
    if task.execute() {
        Ok(())
    } else {
        Err(miette!("source generation failed for {}", args.source.display()))
    }
}
