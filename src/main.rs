//! Filterdeck CLI - apply image filters from the command line.

use anyhow::{anyhow, bail, Context};
use filterdeck::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ {:#}", e);
        if let Some(fix) = suggestion(&e) {
            eprintln!("💡 {}", fix);
        }
        std::process::exit(1);
    }
}

/// Fix hint for the first catalog error in the cause chain.
fn suggestion(error: &anyhow::Error) -> Option<String> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CatalogError>())
        .and_then(CatalogError::suggested_fix)
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("filterdeck");

    if args.len() < 2 {
        print_usage(program);
        return Ok(());
    }

    let command = args[1].as_str();
    if matches!(command, "help" | "--help" | "-h") {
        print_usage(program);
        return Ok(());
    }

    let options = Options::parse(&args[2..])?;
    let config = StudioConfig::load(options.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config)?;

    println!("🎨 Filterdeck v{}", filterdeck::VERSION);
    println!();

    let catalog = Arc::new(FilterCatalog::with_builtins());

    match command {
        "list" => list_filters(&catalog),
        "info" => {
            let id = options.positional(0, "a filter id")?;
            filter_info(&catalog, id, options.json)
        }
        "params" => show_params(&catalog, &config),
        "apply" => {
            let input = options.positional(0, "an input image")?;
            let output = options.positional(1, "an output path")?;
            apply_filter(catalog, &config, &options, Path::new(input), Path::new(output))
        }
        "batch" => {
            let input_dir = options.positional(0, "an input directory")?;
            let output_dir = options.positional(1, "an output directory")?;
            run_batch(catalog, &config, &options, Path::new(input_dir), Path::new(output_dir))
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage(program);
            Ok(())
        }
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                          List all available filters");
    println!("  info <filter> [--json]        Show parameters of a filter");
    println!("  params                        Show resolved parameters as JSON");
    println!("  apply <in> <out> [options]    Filter one image");
    println!("  batch <in-dir> <out-dir> [options]  Filter every image in a folder");
    println!("  help                          Show this help message");
    println!();
    println!("Options:");
    println!("  --filter <id>         Filter to apply (canny, contours, cartoon, fisheye)");
    println!("  --set <name=value>    Set a parameter of the filter (repeatable)");
    println!("  --config <file>       Configuration file (default: {})", filterdeck::config::CONFIG_FILENAME);
    println!("  --pattern <glob>      Batch: file name pattern (default: *)");
    println!("  --recursive           Batch: descend into subdirectories");
    println!();
    println!("Set RUST_LOG to override the configured log level.");
}

/// Parsed command-line options following the command name.
#[derive(Debug, Default)]
struct Options {
    filter: Option<String>,
    sets: Vec<(String, f64)>,
    config: Option<PathBuf>,
    pattern: Option<String>,
    recursive: bool,
    json: bool,
    positional: Vec<String>,
}

impl Options {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut options = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| anyhow!("Option {} needs a value", flag))
            };
            match arg.as_str() {
                "--filter" => options.filter = Some(value("--filter")?),
                "--set" => options.sets.push(parse_assignment(&value("--set")?)?),
                "--config" => options.config = Some(PathBuf::from(value("--config")?)),
                "--pattern" => options.pattern = Some(value("--pattern")?),
                "--recursive" => options.recursive = true,
                "--json" => options.json = true,
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                _ => options.positional.push(arg.clone()),
            }
        }

        Ok(options)
    }

    fn positional(&self, index: usize, what: &str) -> anyhow::Result<&str> {
        self.positional
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("Please specify {}", what))
    }

    fn variant(&self) -> anyhow::Result<Option<FilterVariant>> {
        self.filter
            .as_deref()
            .map(|id| id.parse::<FilterVariant>())
            .transpose()
            .map_err(anyhow::Error::from)
    }
}

fn parse_assignment(text: &str) -> anyhow::Result<(String, f64)> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected name=value, got '{}'", text))?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid number in '{}'", text))?;
    Ok((name.trim().to_string(), value))
}

fn init_logging(config: &StudioConfig) -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(config.log_filter()?)
        .parse_default_env()
        .init();
    Ok(())
}

fn store_with_presets(catalog: Arc<FilterCatalog>, config: &StudioConfig) -> anyhow::Result<ParameterStore> {
    let mut store = ParameterStore::new(catalog);
    let applied = config.apply_presets(&mut store).context("Invalid preset in configuration")?;
    if applied > 0 {
        log::info!("Applied {} preset values", applied);
    }
    Ok(store)
}

fn list_filters(catalog: &FilterCatalog) -> anyhow::Result<()> {
    println!("Available filters ({} total):", catalog.len());
    println!();

    for (category, filters) in catalog.grouped_by_category() {
        println!("  📁 {}", category.display_name());
        for metadata in filters {
            println!("      • {} ({}) - {}", metadata.id(), metadata.variant.menu_label(), metadata.description);
        }
        println!();
    }
    Ok(())
}

fn filter_info(catalog: &FilterCatalog, id: &str, json: bool) -> anyhow::Result<()> {
    let variant: FilterVariant = id.parse()?;
    let metadata = catalog.metadata(variant)?;

    if json {
        println!("{}", serde_json::to_string_pretty(metadata)?);
        return Ok(());
    }

    println!("Filter: {}", metadata.name);
    println!("ID: {}", metadata.id());
    println!("Category: {}", metadata.category.display_name());
    println!();
    println!("Description:");
    println!("  {}", metadata.description);
    println!();

    if metadata.has_parameters() {
        println!("Parameters:");
        for spec in &metadata.parameters {
            println!(
                "  • {} [{} .. {}] = {}",
                spec.name,
                spec.format_value(spec.min),
                spec.format_value(spec.max),
                spec.format_value(spec.default)
            );
            if !spec.description.is_empty() {
                println!("    {}", spec.description);
            }
        }
    } else {
        println!("No adjustable parameters.");
    }
    Ok(())
}

fn show_params(catalog: &Arc<FilterCatalog>, config: &StudioConfig) -> anyhow::Result<()> {
    let store = store_with_presets(Arc::clone(catalog), config)?;
    let report = StoreReport::from_store(&store)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn apply_filter(
    catalog: Arc<FilterCatalog>,
    config: &StudioConfig,
    options: &Options,
    input: &Path,
    output: &Path,
) -> anyhow::Result<()> {
    let variant = options.variant()?.unwrap_or_default();
    let store = store_with_presets(catalog, config)?;
    let mut session = Session::with_engine(store, ApplyEngine::new());

    println!("⚙️  Processing {} -> {}", input.display(), output.display());

    let loaded = session.dispatch(Message::ImageDropped(vec![input.to_path_buf()]))?;
    if loaded.is_empty() {
        bail!("Could not decode image: {}", input.display());
    }

    session.dispatch(Message::SelectFilter(variant))?;
    if variant.is_identity() && !options.sets.is_empty() {
        println!("⚠️  --set ignored without --filter");
    }
    for (name, value) in &options.sets {
        session.dispatch(Message::AdjustParameter {
            name: name.clone(),
            value: *value,
        })?;
    }

    if let Some(controls) = session.controls() {
        for slider in &controls.sliders {
            println!("   • {} = {}", slider.label, slider.display);
        }
    }

    session.dispatch(Message::OpenSaveDialog)?;
    session
        .dispatch(Message::DialogClosed(Some(output.to_path_buf())))
        .with_context(|| format!("Failed to save {}", output.display()))?;

    println!("🎉 Image saved to: {}", output.display());
    Ok(())
}

fn run_batch(
    catalog: Arc<FilterCatalog>,
    config: &StudioConfig,
    options: &Options,
    input_dir: &Path,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let variant = options
        .variant()?
        .ok_or_else(|| anyhow!("Batch runs need --filter <id>"))?;

    let mut store = store_with_presets(catalog, config)?;
    for (name, value) in &options.sets {
        store.set(variant, name, *value)?;
    }

    let pattern = options.pattern.as_deref().unwrap_or(&config.batch.pattern);
    let recursive = options.recursive || config.batch.recursive;

    let job = BatchJob {
        inputs: collect_inputs(input_dir, pattern, recursive)?,
        input_dir: input_dir.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        variant,
        output_format: config.output_format()?,
    };

    println!(
        "⚙️  Applying {} to {} images -> {}",
        variant.menu_label(),
        job.inputs.len(),
        output_dir.display()
    );

    let engine = ApplyEngine::new();
    let report = BatchProcessor::new(&engine, &store).run(&job)?;

    for failure in &report.failed {
        eprintln!("❌ {}", failure);
    }
    println!(
        "✅ Complete in {}ms ({}/{} written)",
        report.duration_ms,
        report.written.len(),
        report.total()
    );

    if !report.is_success() {
        bail!("{} of {} images failed", report.failed.len(), report.total());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let args: Vec<String> = ["in.png", "--filter", "canny", "--set", "threshold = 80", "out.png"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let options = Options::parse(&args).unwrap();

        assert_eq!(options.positional, vec!["in.png", "out.png"]);
        assert_eq!(options.variant().unwrap(), Some(FilterVariant::EdgeDetect));
        assert_eq!(options.sets, vec![("threshold".to_string(), 80.0)]);

        assert!(Options::parse(&["--set".to_string()]).is_err());
        assert!(Options::parse(&["--loud".to_string()]).is_err());
        assert!(parse_assignment("threshold").is_err());
    }

    #[test]
    fn test_suggestion_for_catalog_errors() {
        let unknown_filter = "sepia".parse::<FilterVariant>().map_err(anyhow::Error::from).unwrap_err();
        assert_eq!(
            suggestion(&unknown_filter).as_deref(),
            Some("Run 'list' to see available filters")
        );

        let mut store = ParameterStore::new(Arc::new(FilterCatalog::with_builtins()));
        let bad_set = store
            .set(FilterVariant::FisheyeWarp, "radius", 1.0)
            .map_err(anyhow::Error::from)
            .unwrap_err();
        assert!(suggestion(&bad_set).unwrap().contains("info fisheye_warp"));

        let config = StudioConfig::from_toml("[presets.cartoon]\nlevels = 4.0").unwrap();
        let bad_preset = store_with_presets(Arc::new(FilterCatalog::with_builtins()), &config).unwrap_err();
        assert!(suggestion(&bad_preset).unwrap().contains("info cartoonize"));

        assert!(suggestion(&anyhow!("disk full")).is_none());
    }
}
