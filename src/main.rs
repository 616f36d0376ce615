use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veronica::gateway::{CaptureGateway, MicrophoneGateway};
use veronica::run_loop::LISTEN_PROMPT;
use veronica::voice::{AudioCapture, AudioPlayback, PLAYBACK_SAMPLE_RATE, calculate_energy};
use veronica::{Config, Daemon, IntentStore};

/// Verônica - voice command assistant
#[derive(Parser)]
#[command(name = "veronica", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Olá! Este é um teste do sistema de síntese de voz.")]
        text: String,
    },
    /// Capture one utterance and print its transcript
    Listen {
        /// Seconds to wait for speech to start
        #[arg(short, long, default_value = "10")]
        timeout: u64,
    },
    /// Manage the intent catalogue
    Intent {
        #[command(subcommand)]
        command: IntentCommand,
    },
    /// Inspect captured feedback
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommand,
    },
    /// Show recent interactions
    History {
        /// Number of interactions to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum IntentCommand {
    /// Add an intent with its responses
    Add {
        /// Intent name, matched as a substring of commands
        name: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Response text (repeatable)
        #[arg(short, long = "response", required = true)]
        responses: Vec<String>,
    },
    /// Add a response to an existing intent
    Respond {
        /// Intent ID
        id: i64,
        /// Response text
        text: String,
    },
    /// Show one intent and its responses in match order
    Show {
        /// Intent ID
        id: i64,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List intents in match order
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FeedbackCommand {
    /// List feedback, oldest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info",
        1 => "info,veronica=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(&text).await,
            Command::Listen { timeout } => listen(timeout).await,
            Command::Intent { command } => intent(command),
            Command::Feedback {
                command: FeedbackCommand::List { json },
            } => feedback_list(json),
            Command::History { limit, json } => history(limit, json),
        };
    }

    tracing::info!("starting veronica");

    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    let daemon = Daemon::new(config)?;

    tracing::info!("veronica ready - say \"Verônica\" followed by a command");

    // Run until interrupted
    daemon.run().await?;

    Ok(())
}

/// Open the configured intent store
fn open_store() -> anyhow::Result<IntentStore> {
    let config = Config::load()?;
    let store = IntentStore::open(&config.db_path)?;
    store.ensure_schema()?;
    Ok(store)
}

/// Test microphone input
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    let sample_rate = capture.sample_rate();
    println!("Sample rate: {sample_rate} Hz");
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.peek_buffer();
        let energy = calculate_energy(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );

        capture.clear_buffer();
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;

    let frequency = 440.0_f32;
    #[allow(clippy::cast_precision_loss)]
    let sample_rate = PLAYBACK_SAMPLE_RATE as f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let num_samples = (sample_rate * 2.0) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3
        })
        .collect();

    println!("Playing {} samples at {PLAYBACK_SAMPLE_RATE} Hz...", samples.len());

    tokio::task::spawn_blocking(move || playback.play_blocking(samples)).await??;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");
    println!("If you didn't hear anything, check:");
    println!("  1. Run: pactl info | grep 'Default Sink'");
    println!("  2. Run: pactl list sinks short");

    Ok(())
}

/// Test TTS output through the configured provider
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load()?;
    let tts = config.text_to_speech()?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    println!("Playing audio...");
    let playback = AudioPlayback::new()?;
    tokio::task::spawn_blocking(move || playback.play_mp3_blocking(&mp3_data)).await??;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}

/// Capture one utterance through the same path the assistant uses
async fn listen(timeout: u64) -> anyhow::Result<()> {
    let config = Config::load()?;
    let gateway = MicrophoneGateway::new(&config)?;

    let transcript = gateway
        .listen(LISTEN_PROMPT, Some(Duration::from_secs(timeout)), None)
        .await;

    if transcript.is_empty() {
        println!("(nothing understood)");
    } else {
        println!("{transcript}");
    }

    Ok(())
}

fn intent(command: IntentCommand) -> anyhow::Result<()> {
    let store = open_store()?;
    let intents = store.intents();

    match command {
        IntentCommand::Add {
            name,
            description,
            responses,
        } => {
            let intent = intents.add_intent(&name, description.as_deref(), &responses)?;
            println!(
                "Added intent {} \"{}\" with {} response(s)",
                intent.id,
                intent.name,
                responses.len()
            );
        }
        IntentCommand::Respond { id, text } => {
            let response = intents.add_response(id, &text)?;
            println!("Added response {} to intent {id}", response.id);
        }
        IntentCommand::Show { id, json } => {
            let intent = intents
                .find(id)?
                .ok_or_else(|| anyhow::anyhow!("intent {id} not found"))?;
            let responses = intents.responses(id)?;

            if json {
                let value = serde_json::json!({ "intent": intent, "responses": responses });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{:>4}  {}", intent.id, intent.name);
                if let Some(description) = &intent.description {
                    println!("      {description}");
                }
                for response in responses {
                    println!("  {:>4}  {}", response.id, response.response_text);
                }
            }
        }
        IntentCommand::List { json } => {
            let list = intents.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.is_empty() {
                println!("No intents. Add one with: veronica intent add <name> -r <response>");
            } else {
                for summary in list {
                    let description = summary.intent.description.as_deref().unwrap_or("");
                    println!(
                        "{:>4}  {:<24} {:>3} response(s)  {description}",
                        summary.intent.id, summary.intent.name, summary.responses
                    );
                }
            }
        }
    }

    Ok(())
}

fn feedback_list(json: bool) -> anyhow::Result<()> {
    let store = open_store()?;
    let feedback = store.feedback().list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&feedback)?);
    } else if feedback.is_empty() {
        println!("No feedback recorded");
    } else {
        for entry in feedback {
            println!("{:>4}  \"{}\" -> {}", entry.id, entry.command, entry.feedback);
        }
    }

    Ok(())
}

fn history(limit: usize, json: bool) -> anyhow::Result<()> {
    let store = open_store()?;
    let interactions = store.interactions().recent(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&interactions)?);
    } else if interactions.is_empty() {
        println!("No interactions recorded");
    } else {
        for entry in interactions {
            println!(
                "{}  \"{}\" -> {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.command,
                entry.response
            );
        }
    }

    Ok(())
}
