use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use report_localizer::config::{constants, LocalizerConfig};
use report_localizer::core::{
    create_translated_documents, extract_report, print_error_message, print_info_message,
    save_extraction, ReportSource,
};
use report_localizer::env::{describe_variables, EnvConfig};
use report_localizer::error::LocalizerResult;
use report_localizer::extraction::{
    IdentifierSource, MixedContentPolicy, RandomUuids, SeededUuids, SelectorSpec,
};

/// Extract report text for translation and build one localized report per language.
#[derive(Parser)]
#[command(name = "report-localizer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug events
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag translatable elements and export them as CSV.
    Extract {
        /// Source HTML report
        input: PathBuf,

        /// Where to write the `id,content` CSV
        #[arg(short, long)]
        export: PathBuf,

        /// Where to write the tagged report
        #[arg(short, long)]
        tagged: PathBuf,

        /// Select elements by tag name
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Select elements by CSS class
        #[arg(long = "class")]
        classes: Vec<String>,

        /// Select elements by id
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Add the standard report selectors (headings, paragraphs, table headers, list items)
        #[arg(long)]
        report_defaults: bool,

        /// Attribute that carries the extraction identifier
        #[arg(long)]
        id_attribute: Option<String>,

        /// Charset of the source report
        #[arg(long)]
        encoding: Option<String>,

        /// Derive identifiers from this seed so runs are reproducible
        #[arg(long)]
        seed: Option<String>,

        /// Skip elements with child elements instead of failing
        #[arg(long)]
        skip_mixed_content: bool,
    },

    /// Write one localized report per language from a translation table.
    Reinject {
        /// Tagged report written by `extract`
        tagged: PathBuf,

        /// CSV returned by the translation service
        translations: PathBuf,

        /// Directory for localized reports
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Target language, matched exactly against the CSV header
        #[arg(short, long = "language")]
        languages: Vec<String>,

        /// Output file name template, must contain %language%
        #[arg(long)]
        output_template: Option<String>,

        /// Attribute that carries the extraction identifier
        #[arg(long)]
        id_attribute: Option<String>,

        /// Treat this cell value as a missing translation (repeatable)
        #[arg(long = "missing-marker")]
        missing_markers: Vec<String>,

        /// Treat common spreadsheet placeholders (NaN, N/A, NULL, ...) as missing translations
        #[arg(long)]
        default_missing_markers: bool,

        /// Number of parallel reinjection workers
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

fn main() {
    let matches = Cli::command()
        .after_help(format!("Environment variables:\n{}", describe_variables()))
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let env_config = match EnvConfig::from_env() {
        Ok(env_config) => env_config,
        Err(e) => {
            print_error_message(&e.to_string(), true);
            process::exit(1);
        }
    };

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::from_str(&env_config.log_level).unwrap_or(tracing::Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!env_config.no_color)
        .init();

    if let Err(e) = run(cli, &env_config) {
        print_error_message(&e.to_string(), !env_config.no_color);
        process::exit(1);
    }
}

fn run(cli: Cli, env_config: &EnvConfig) -> LocalizerResult<()> {
    let mut config = match &cli.config {
        Some(path) => LocalizerConfig::from_file(path)?,
        None => LocalizerConfig::default(),
    };

    match cli.command {
        Commands::Extract {
            input,
            export,
            tagged,
            tags,
            classes,
            ids,
            report_defaults,
            id_attribute,
            encoding,
            seed,
            skip_mixed_content,
        } => {
            let mut selectors = std::mem::take(&mut config.selectors);
            if report_defaults {
                let defaults = SelectorSpec::report_defaults();
                selectors.tags.extend(defaults.tags);
                selectors.classes.extend(defaults.classes);
                selectors.ids.extend(defaults.ids);
            }
            config.selectors = selectors.with_tags(tags).with_classes(classes).with_ids(ids);

            if let Some(id_attribute) = id_attribute {
                config.id_attribute = id_attribute;
            }
            if let Some(encoding) = encoding {
                config.encoding = encoding;
            }
            if skip_mixed_content {
                config.mixed_content = MixedContentPolicy::Skip;
            }
            config.validate_for_extraction()?;

            let mut id_source: Box<dyn IdentifierSource> = match seed {
                Some(seed) => Box::new(SeededUuids::new(&seed)),
                None => Box::new(RandomUuids),
            };

            let extraction = extract_report(
                &ReportSource::File(input),
                &config.selectors,
                &config.extract_options(),
                id_source.as_mut(),
            )?;
            save_extraction(&extraction, &export, &tagged)?;

            print_info_message(&tagged.display().to_string());
            print_info_message(&export.display().to_string());
            if !extraction.diagnostics.is_empty() {
                tracing::warn!("提取过程中有 {} 条警告", extraction.diagnostics.len());
            }
        }

        Commands::Reinject {
            tagged,
            translations,
            output_dir,
            languages,
            output_template,
            id_attribute,
            missing_markers,
            default_missing_markers,
            workers,
        } => {
            if !languages.is_empty() {
                config.languages = languages;
            }
            if let Some(output_template) = output_template {
                config.output_template = output_template;
            }
            if let Some(id_attribute) = id_attribute {
                config.id_attribute = id_attribute;
            }
            if default_missing_markers {
                config.missing_markers.extend(
                    constants::DEFAULT_MISSING_MARKERS
                        .iter()
                        .map(|marker| marker.to_string()),
                );
            }
            config.missing_markers.extend(missing_markers);
            config.workers = workers.or(env_config.worker_threads).or(config.workers);
            config.validate_for_reinjection()?;

            let report = create_translated_documents(
                &tagged,
                &translations,
                &output_dir,
                &config.languages,
                &config.output_template,
                &config.reinject_options(),
            )?;

            for path in &report.paths {
                print_info_message(&path.display().to_string());
            }
            if !report.diagnostics.is_empty() {
                tracing::warn!("回填过程中有 {} 条警告", report.diagnostics.len());
            }
        }
    }

    Ok(())
}
