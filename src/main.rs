use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vargen::{
    logger::{self, LogLevel, LoggerConfig},
    pipeline::save_results,
    Config, CredentialStore, GeminiClient, HostImporter, LogProgress, ProcessBridge, Session,
    UploadedImage, VariationError, VariationOptions, VariationPipeline,
};

#[derive(Parser)]
#[command(name = "vargen", version, about = "Generate AI variations of an image")]
struct Cli {
    /// Debug-level logging with source locations
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze an image and generate four variations of it
    Generate {
        /// Image to vary
        #[arg(required_unless_present = "from_frame")]
        image: Option<PathBuf>,

        /// Use the host's current composition frame instead of a file
        #[arg(long, conflicts_with = "image")]
        from_frame: bool,

        #[arg(long)]
        preserve_colors: bool,

        #[arg(long)]
        preserve_composition: bool,

        /// Directory the variations are written to
        #[arg(short, long, default_value = "variations")]
        out: PathBuf,

        /// Also import every variation into the host project
        #[arg(long)]
        import: bool,

        /// Print the result grid description as JSON on stdout
        #[arg(long)]
        print_render: bool,
    },
    /// Store the Gemini API key for later runs
    SaveKey { key: String },
    /// Show the host's current project
    ProjectInfo,
    /// Import an image file into the host project
    Import {
        file: PathBuf,

        /// Replace the source of the selected layer instead
        #[arg(long)]
        replace: bool,

        /// Do not add the footage to the active composition
        #[arg(long)]
        no_comp: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();
    let config = Config::from_env();

    let logger_config = if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::default().with_level(LogLevel::Info)
    };
    logger::init_with_config(logger_config.with_json_output(cli.json_logs || config.log_json))?;

    logger::log_startup_info("vargen", env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using system environment variables");
    }
    if cli.verbose {
        logger::log_config_info(&config);
    }

    let outcome = match cli.command {
        Command::Generate {
            image,
            from_frame,
            preserve_colors,
            preserve_composition,
            out,
            import,
            print_render,
        } => {
            let options = VariationOptions::new()
                .with_preserve_colors(preserve_colors)
                .with_preserve_composition(preserve_composition);
            let request = GenerateArgs {
                image,
                from_frame,
                options,
                out,
                import,
                print_render,
            };
            generate(&config, request).await
        }
        Command::SaveKey { key } => save_key(&config, &key),
        Command::ProjectInfo => project_info(&config),
        Command::Import {
            file,
            replace,
            no_comp,
        } => import_file(&config, &file, replace, no_comp),
    };

    if let Err(e) = &outcome {
        log::error!("{}", e.message());
    }
    outcome.map_err(Into::into)
}

struct GenerateArgs {
    image: Option<PathBuf>,
    from_frame: bool,
    options: VariationOptions,
    out: PathBuf,
    import: bool,
    print_render: bool,
}

fn save_key(config: &Config, key: &str) -> vargen::Result<()> {
    let store = CredentialStore::for_config(config)?;
    store.save(key)?;
    println!("API key saved to {}", store.path().display());
    Ok(())
}

async fn generate(config: &Config, args: GenerateArgs) -> vargen::Result<()> {
    let credential = match &config.gemini.api_key {
        Some(key) => Some(vargen::Credential::new(key.clone())),
        None => CredentialStore::for_config(config)?.load()?,
    };

    let image = match (&args.image, args.from_frame) {
        (_, true) => host_importer(config)?.export_current_frame()?,
        (Some(path), false) => UploadedImage::from_path(path)?,
        (None, false) => {
            return Err(VariationError::ConfigError(
                "provide an image path or --from-frame".into(),
            ))
        }
    };
    log::info!(
        "Loaded {} ({}, {} bytes)",
        image.filename,
        image.mime_type,
        image.bytes.len()
    );

    let mut session = Session::new().with_options(args.options);
    session.credential = credential;
    session.select_image(image);

    let (analyzer, generator) = GeminiClient::new(&config.gemini)?.into_parts();
    let mut pipeline = VariationPipeline::new(analyzer, generator);
    let output = pipeline.run(&session, &LogProgress).await?;

    for attempt in output.failed_attempts() {
        log::warn!("Variation {} was skipped: {:?}", attempt.index, attempt.outcome);
    }

    let saved = save_results(&args.out, &output.results)?;

    if args.import {
        let importer = host_importer(config)?;
        for (result, tile) in output.results.iter().zip(&output.render.tiles) {
            match importer.import_to_host(&result.image, &tile.filename) {
                Ok(()) => log::info!("Image imported to host: {}", tile.filename),
                Err(e) => log::error!("Failed to import image {}: {}", tile.filename, e.message()),
            }
        }
    }

    if args.print_render {
        let json = serde_json::to_string_pretty(&output.render)
            .map_err(|e| VariationError::SerializationError(e.to_string()))?;
        println!("{}", json);
    } else {
        for path in saved {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn host_importer(config: &Config) -> vargen::Result<HostImporter<ProcessBridge>> {
    let command = config.host_bridge.as_deref().ok_or_else(|| {
        VariationError::ConfigError("set VARGEN_HOST_BRIDGE to the host script runner".into())
    })?;
    Ok(HostImporter::new(ProcessBridge::from_command_line(command)?))
}

fn project_info(config: &Config) -> vargen::Result<()> {
    let info = host_importer(config)?.project_info()?;
    println!("Project: {} ({} items)", info.name, info.num_items);
    match info.active_comp {
        Some(comp) => println!(
            "Active composition: {} {}x{} {:.2}s @ {} fps",
            comp.name, comp.width, comp.height, comp.duration, comp.frame_rate
        ),
        None => println!("Active composition: none"),
    }
    Ok(())
}

fn import_file(
    config: &Config,
    file: &std::path::Path,
    replace: bool,
    no_comp: bool,
) -> vargen::Result<()> {
    let image = UploadedImage::from_path(file)?;
    let importer = host_importer(config)?.with_add_to_active_comp(!no_comp);
    if replace {
        importer.replace_layer_source(&image.bytes, &image.filename)?;
    } else {
        importer.import_to_host(&image.bytes, &image.filename)?;
    }
    println!("Imported {}", image.filename);
    Ok(())
}
