//! DishaNav command line.
//!
//! - `replay`: walk a recorded trace through the guidance engine
//! - `follow`: read live `lat,lng` positions from stdin
//! - `resolve`: look up a destination without navigating

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use disha_nav::destination::{self, DestinationInput, ResolvedDestination};
use disha_nav::speech::{ConsoleSpeech, ProcessSpeech};
use disha_nav::status::format_distance;
use disha_nav::{
    DestinationSetter, DishaConfig, DisplayState, GeoPoint, Geocoder, GoogleGeocoder,
    GuidanceSession, Phrasebook, Result, SpeechDispatcher, SpeechSink, SvgTrackMap, Topic,
    UpdateCoordinator, WalkTrace,
};

/// Longest wait for the final utterance before exiting.
const SPEECH_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Spoken navigation guidance for a smart white cane
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: disha.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded walk
    Replay(ReplayCommand),

    /// Guide live positions read from stdin, one `lat,lng` per line
    Follow(FollowCommand),

    /// Resolve a destination and print its coordinates
    Resolve {
        /// Address or `lat,lng`
        input: String,
    },
}

#[derive(Parser, Debug)]
struct ReplayCommand {
    /// Trace file (TOML)
    trace: PathBuf,

    /// Write the walked track as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Delay between samples, overriding the trace
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Start with speech disabled
    #[arg(long)]
    mute: bool,

    /// Print each display state as a JSON line
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FollowCommand {
    /// Destination address or `lat,lng`
    #[arg(long)]
    to: String,

    /// Start with speech disabled
    #[arg(long)]
    mute: bool,

    /// Print each display state as a JSON line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("disha_nav=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    info!("DishaNav v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Replay(args) => replay(&config, args),
        Commands::Follow(args) => follow(&config, args),
        Commands::Resolve { input } => resolve(&config, &input),
    }
}

fn load_config(path: Option<&Path>) -> Result<DishaConfig> {
    if let Some(path) = path {
        info!("Loading configuration from {:?}", path);
        return DishaConfig::load(path);
    }
    let default_path = Path::new("disha.toml");
    if default_path.exists() {
        info!("Loading configuration from disha.toml");
        DishaConfig::load(default_path)
    } else {
        info!("Using default configuration");
        Ok(DishaConfig::default())
    }
}

fn speech_sink(config: &DishaConfig) -> Box<dyn SpeechSink> {
    if config.speech.program.trim().is_empty() {
        Box::new(ConsoleSpeech::default())
    } else {
        info!("Speaking through {}", config.speech.program);
        Box::new(ProcessSpeech::new(
            &config.speech,
            config.guidance.language.voice(),
        ))
    }
}

fn build_coordinator(config: &DishaConfig, mute: bool) -> UpdateCoordinator {
    let phrases = Phrasebook::new(config.guidance.language);
    let coordinator = UpdateCoordinator::new(
        GuidanceSession::new(phrases),
        SpeechDispatcher::from_config(&config.speech),
        speech_sink(config),
    );
    if mute {
        coordinator.set_speech_enabled(false);
    }
    coordinator
}

/// Resolve and publish a destination, speaking the outcome either way.
fn start_destination(
    input: &str,
    geocoder: &dyn Geocoder,
    coordinator: &UpdateCoordinator,
    destinations: &dyn DestinationSetter,
) -> Result<ResolvedDestination> {
    destination::set_destination(input, geocoder, destinations, |resolved| {
        coordinator.announce_destination(resolved)
    })
    .inspect_err(|e| coordinator.announce_warning(&e.to_string()))
}

/// Write one display state line; with `json`, exactly one JSON object per line.
fn print_state(
    out: &mut dyn Write,
    state: &DisplayState,
    phrases: &Phrasebook,
    json: bool,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(state)?)?;
        return Ok(());
    }
    let distance = state
        .distance
        .map(|d| format_distance(d, phrases))
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "{:<24} {:>10}  {}",
        state.status.label(phrases),
        distance,
        state.last_instruction
    )?;
    Ok(())
}

fn wait_for_speech(coordinator: &UpdateCoordinator) {
    let start = Instant::now();
    while coordinator.is_speaking() && start.elapsed() < SPEECH_DRAIN_TIMEOUT {
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn replay(config: &DishaConfig, args: ReplayCommand) -> Result<()> {
    let trace = WalkTrace::load(&args.trace)?;
    let interval = Duration::from_millis(args.interval_ms.unwrap_or(trace.interval_ms));
    info!(
        "Replaying {} positions from {:?}",
        trace.positions.len(),
        args.trace
    );

    let geocoder = GoogleGeocoder::new(&config.geocoder)?;
    let positions: Topic<GeoPoint> = Topic::new("position");
    let destinations: Topic<GeoPoint> = Topic::new("destination");

    let map = Rc::new(RefCell::new(SvgTrackMap::new()));
    let mut coordinator =
        build_coordinator(config, args.mute).with_map(Box::new(Rc::clone(&map)));
    coordinator.attach(&positions, &destinations);
    let phrases = coordinator.phrases();

    start_destination(&trace.destination, &geocoder, &coordinator, &destinations)?;

    let mut stdout = std::io::stdout().lock();
    for position in &trace.positions {
        positions.publish(*position);
        print_state(&mut stdout, &coordinator.snapshot(), &phrases, args.json)?;
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    wait_for_speech(&coordinator);
    info!(
        "Replay finished after {} updates",
        coordinator.update_count()
    );
    coordinator.teardown();

    let svg_path = args
        .svg
        .or_else(|| config.output.svg_path.as_ref().map(PathBuf::from));
    if let Some(path) = svg_path {
        map.borrow().save(&path)?;
        info!("Track written to {:?}", path);
    }
    Ok(())
}

/// Parse a stdin line as raw coordinates; range checks happen downstream.
fn parse_sample(line: &str) -> Option<GeoPoint> {
    let (lat, lng) = line.split_once(',')?;
    Some(GeoPoint::new(
        lat.trim().parse().ok()?,
        lng.trim().parse().ok()?,
    ))
}

fn follow(config: &DishaConfig, args: FollowCommand) -> Result<()> {
    let geocoder = GoogleGeocoder::new(&config.geocoder)?;
    let positions: Topic<GeoPoint> = Topic::new("position");
    let destinations: Topic<GeoPoint> = Topic::new("destination");

    let mut coordinator = build_coordinator(config, args.mute);
    coordinator.attach(&positions, &destinations);
    let phrases = coordinator.phrases();

    start_destination(&args.to, &geocoder, &coordinator, &destinations)?;
    info!("Reading positions from stdin ('toggle' switches speech, 'quit' exits)");

    let mut stdout = std::io::stdout().lock();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        match line {
            "" => continue,
            "quit" => break,
            "toggle" => {
                let enabled = coordinator.toggle_speech();
                info!("Speech {}", if enabled { "on" } else { "off" });
                continue;
            }
            _ => {}
        }
        match parse_sample(line) {
            Some(position) => positions.publish(position),
            None => {
                warn!("Unreadable position line: {:?}", line);
                continue;
            }
        }
        print_state(&mut stdout, &coordinator.snapshot(), &phrases, args.json)?;
    }

    wait_for_speech(&coordinator);
    coordinator.teardown();
    Ok(())
}

fn resolve(config: &DishaConfig, input: &str) -> Result<()> {
    let geocoder = GoogleGeocoder::new(&config.geocoder)?;
    if !geocoder.is_configured() {
        warn!("No geocoding API key; only coordinates can be resolved");
    }
    let parsed = DestinationInput::parse(input)?;
    let resolved = destination::resolve(&parsed, &geocoder)?;
    println!("{}\t{}", resolved.point, resolved.label);
    Ok(())
}
