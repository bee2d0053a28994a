//! narrate - Format documents for text-to-speech and plan streaming chunks

mod config;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use config::NarrateConfig;
use prosody::{ChunkPlan, ExtractedContent, ProsodyConfig, ProsodyFormatter};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "narrate")]
#[command(about = "Format documents for text-to-speech and plan streaming chunks", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the document formatted for speech
    Format {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Print every chunk in playback order
    Chunks {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        overrides: Overrides,
        /// Chunks to synthesize immediately (default from config)
        #[arg(long)]
        first: Option<usize>,
        /// Print chunks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a single chunk by index
    Chunk {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        overrides: Overrides,
        /// Zero-based chunk index
        #[arg(short, long)]
        index: usize,
    },
    /// Show chunk metadata without generating audio
    Summary {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        overrides: Overrides,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ClapArgs, Debug)]
struct InputArgs {
    /// Input file (plain text, markdown or HTML); reads stdin when omitted or "-"
    file: Option<PathBuf>,

    /// Input is extracted-content JSON ({"title", "content", "site_name"})
    #[arg(long)]
    extracted: bool,
}

#[derive(ClapArgs, Debug)]
struct Overrides {
    /// Chunk budget in characters
    #[arg(long)]
    target_chars: Option<usize>,

    /// Emit <break> pause instructions
    #[arg(long)]
    pause_markup: bool,

    /// Drop parentheticals longer than this
    #[arg(long)]
    max_parenthetical: Option<usize>,

    /// Split sentences longer than the budget at clause boundaries
    #[arg(long)]
    split_sentences: bool,
}

impl Overrides {
    fn apply(&self, mut config: ProsodyConfig) -> ProsodyConfig {
        if let Some(target) = self.target_chars {
            config.target_chars = target;
        }
        if self.pause_markup {
            config.use_pause_markup = true;
        }
        if let Some(max) = self.max_parenthetical {
            config.max_parenthetical_length = max;
        }
        if self.split_sentences {
            config.split_oversized_sentences = true;
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default chunk budget
    SetTargetChars {
        /// Characters per chunk (at least 1)
        value: usize,
    },
    /// Enable or disable pause markup
    SetPauseMarkup {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Set parenthetical length threshold
    SetMaxParenthetical {
        /// Characters
        value: usize,
    },
    /// Set how many chunks are synthesized immediately
    SetInitialChunks {
        /// Chunk count
        value: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match &args.command {
        Commands::Config { action } => handle_config_command(action),
        Commands::Format { input, overrides } => {
            let (formatter, _) = build_formatter(overrides)?;
            let text = format_input(&formatter, input)?;
            println!("{}", text);
            Ok(())
        }
        Commands::Chunks {
            input,
            overrides,
            first,
            json,
        } => {
            let (formatter, config) = build_formatter(overrides)?;
            let plan = chunk_input(&formatter, input)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(plan.chunks())?);
            } else {
                print_chunks(&plan, first.unwrap_or(config.initial_chunks));
            }
            Ok(())
        }
        Commands::Chunk {
            input,
            overrides,
            index,
        } => {
            let (formatter, _) = build_formatter(overrides)?;
            let plan = chunk_input(&formatter, input)?;
            let chunk = plan.get(*index)?;
            println!("{}", chunk.text);
            Ok(())
        }
        Commands::Summary {
            input,
            overrides,
            json,
        } => {
            let (formatter, _) = build_formatter(overrides)?;
            let summary = chunk_input(&formatter, input)?.summary();
            if *json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Chunks: {}", summary.total_chunks);
                println!("Characters: {}", summary.total_chars);
                println!("Words: {}", summary.total_words);
                println!("Estimated duration: {:.1}s", summary.estimated_duration_secs);
                for info in &summary.chunks {
                    println!();
                    println!(
                        "[{}] {} chars, {} words",
                        info.index, info.char_count, info.word_count
                    );
                    println!("    {}", info.preview.replace('\n', " "));
                }
            }
            Ok(())
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn build_formatter(overrides: &Overrides) -> Result<(ProsodyFormatter, NarrateConfig)> {
    let config = NarrateConfig::load().context("Failed to load configuration")?;
    let prosody_config = overrides.apply(config.formatter.clone());
    log::debug!("formatter config: {:?}", prosody_config);

    let formatter = ProsodyFormatter::new(prosody_config).context("Invalid formatter settings")?;
    Ok((formatter, config))
}

fn read_input(input: &InputArgs) -> Result<String> {
    match &input.file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn format_input(formatter: &ProsodyFormatter, input: &InputArgs) -> Result<String> {
    let raw = read_input(input)?;
    let formatted = if input.extracted {
        let content: ExtractedContent =
            serde_json::from_str(&raw).context("Failed to parse extracted content JSON")?;
        log::debug!("formatting \"{}\"", content.title);
        formatter.format_extracted(&content)?
    } else {
        formatter.format(&raw)?
    };
    Ok(formatted)
}

fn chunk_input(formatter: &ProsodyFormatter, input: &InputArgs) -> Result<ChunkPlan> {
    let formatted = format_input(formatter, input)?;
    Ok(formatter.chunk_formatted(&formatted))
}

fn print_chunks(plan: &ChunkPlan, initial: usize) {
    let (first, rest) = plan.split_at(initial);
    for chunk in first {
        println!("--- chunk {} (immediate) ---", chunk.index);
        println!("{}", chunk.text);
    }
    for chunk in rest {
        println!("--- chunk {} (queued) ---", chunk.index);
        println!("{}", chunk.text);
    }
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = NarrateConfig::load()?;
            println!("Configuration file: {:?}", NarrateConfig::config_path());
            println!();
            println!("target_chars = {}", config.formatter.target_chars);
            println!("use_pause_markup = {}", config.formatter.use_pause_markup);
            println!(
                "max_parenthetical_length = {}",
                config.formatter.max_parenthetical_length
            );
            println!(
                "split_oversized_sentences = {}",
                config.formatter.split_oversized_sentences
            );
            println!("initial_chunks = {}", config.initial_chunks);
            let glyphs: String = config.formatter.bullet_glyphs.iter().collect();
            println!("bullet_glyphs = \"{}\"", glyphs);
            if config.formatter.extra_abbreviations.is_empty() {
                println!("extra_abbreviations = (none)");
            }
            for entry in &config.formatter.extra_abbreviations {
                println!("abbreviation \"{}\" = \"{}\"", entry.abbreviation, entry.expansion);
            }
            if config.formatter.transition_words.is_none() {
                println!("transition_words = (built-in)");
            }
        }
        ConfigAction::SetTargetChars { value } => {
            if *value == 0 {
                anyhow::bail!("Chunk budget must be at least 1 character");
            }
            let mut config = NarrateConfig::load()?;
            config.formatter.target_chars = *value;
            config.save()?;
            println!("Default chunk budget set to: {}", value);
        }
        ConfigAction::SetPauseMarkup { value } => {
            let mut config = NarrateConfig::load()?;
            config.formatter.use_pause_markup = *value;
            config.save()?;
            println!("Pause markup set to: {}", value);
        }
        ConfigAction::SetMaxParenthetical { value } => {
            let mut config = NarrateConfig::load()?;
            config.formatter.max_parenthetical_length = *value;
            config.save()?;
            println!("Parenthetical threshold set to: {}", value);
        }
        ConfigAction::SetInitialChunks { value } => {
            let mut config = NarrateConfig::load()?;
            config.initial_chunks = *value;
            config.save()?;
            println!("Initial chunks set to: {}", value);
        }
    }
    Ok(())
}
