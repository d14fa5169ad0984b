//! Scrapbook Replay
//!
//! Plays a scripted input session through the slide sequencer headlessly and
//! prints every surface message as one JSON line on stdout.
//!
//! # Usage
//!
//! ```bash
//! # Replay the bundled tour
//! scrapbook-replay --script demos/tour.json
//!
//! # Jump instead of animating the slide track
//! scrapbook-replay --script demos/tour.json --no-animate
//!
//! # With verbose logging (stderr)
//! RUST_LOG=debug scrapbook-replay --script demos/tour.json
//! ```
//!
//! # Environment Variables
//!
//! - `SCRAPBOOK_SCRIPT`: Script path when `--script` is omitted
//! - `SCRAPBOOK_*`: Sequencer overrides (see `scrapbook_core::config`)
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

mod script;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use scrapbook_core::{
    load_config, load_config_from_path, BlossomToggle, ClockAnimator, ConfigOverrides,
    InputEvent, IntroReveal, MemoryStage, PropertyStore, ScrapbookChoreography,
    ScrapbookConfigFile, SequencerMessage, SlideSequencer,
};

use crate::script::{Script, ScriptAction};

/// Replay a scripted scrapbook session
#[derive(Debug, Parser)]
#[command(name = "scrapbook-replay", version, about)]
struct Args {
    /// Script to replay
    #[arg(long, env = "SCRAPBOOK_SCRIPT")]
    script: PathBuf,

    /// Config file (defaults to ~/.config/scrapbook/sequencer.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Jump the slide track instead of animating it
    #[arg(long)]
    no_animate: bool,

    /// Animator sampling interval in milliseconds
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Seed for the petal field
    #[arg(long)]
    petal_seed: Option<u64>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if self.no_animate {
            overrides = overrides.with_animate(false);
        }
        if let Some(ms) = self.frame_ms {
            overrides = overrides.with_frame_interval_ms(ms);
        }
        overrides
    }
}

fn load(args: &Args) -> anyhow::Result<ScrapbookConfigFile> {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(Some(path.clone()))?,
        None => load_config()?,
    };
    args.overrides().apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scrapbook_replay=info".parse()?)
                .add_directive("scrapbook_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();
    let config = load(&args)?;
    info!(source = %config.source(), "Configuration loaded");

    let script = Script::load(&args.script)?;
    info!(
        path = %args.script.display(),
        steps = script.steps.len(),
        duration_ms = script.duration().as_millis(),
        "Script loaded"
    );

    // Collaborators
    let mut animator =
        ClockAnimator::new(PropertyStore::new()).with_frame_interval(config.frame_interval);
    for (selector, count) in &script.elements {
        animator = animator.with_elements(selector.as_str(), *count);
    }
    let animator = Arc::new(animator);
    let stage = Arc::new(MemoryStage::new());
    let hooks = Arc::new(ScrapbookChoreography::new(
        Arc::clone(&animator),
        Arc::clone(&stage),
        config.choreography.clone(),
    ));

    // Sequencer -> stdout
    let (msg_tx, mut msg_rx) =
        mpsc::channel::<SequencerMessage>(config.sequencer.message_buffer);
    let printer = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to encode message"),
            }
        }
    });

    let sequencer = SlideSequencer::new(
        config.sequencer.clone(),
        Arc::clone(&animator),
        hooks,
        msg_tx.clone(),
    )
    .with_scroll_probe(stage.clone());

    let intro = Arc::new(IntroReveal::new(
        config.intro.clone(),
        Arc::clone(&animator),
        Arc::clone(&stage),
        sequencer.navigation_flag(),
        msg_tx,
    ));
    let blossom = match args.petal_seed {
        Some(seed) => BlossomToggle::seeded(Arc::clone(&stage), seed),
        None => BlossomToggle::new(Arc::clone(&stage)),
    };

    // Script -> sequencer
    let (input_tx, input_rx) = mpsc::channel::<InputEvent>(64);
    let input_loop = tokio::spawn(sequencer.clone().run_input_loop(input_rx));
    let mut intro_tasks: Vec<JoinHandle<bool>> = Vec::new();

    let started = Instant::now();
    for step in &script.steps {
        tokio::time::sleep_until(started + step.at()).await;

        match &step.action {
            ScriptAction::IntroWheel { delta_y } => {
                let intro = Arc::clone(&intro);
                let delta_y = *delta_y;
                intro_tasks.push(tokio::spawn(async move { intro.on_wheel(delta_y).await }));
            }
            ScriptAction::CameraClick => {
                let intro = Arc::clone(&intro);
                intro_tasks.push(tokio::spawn(async move { intro.on_camera_click().await }));
            }
            ScriptAction::Input { event } => {
                if input_tx.send(event.clone()).await.is_err() {
                    warn!("Input loop stopped early");
                    break;
                }
            }
            ScriptAction::BlossomToggle { checked } => blossom.set_checked(*checked),
            action @ ScriptAction::InnerScroll { .. } => {
                if let Some((slide, state)) = action.inner_scroll() {
                    stage.set_inner_scroll(slide, state);
                }
            }
        }
    }

    // Let everything in flight settle
    drop(input_tx);
    input_loop.await?;
    for task in intro_tasks {
        task.await?;
    }

    info!(
        state = %sequencer.state().description(),
        intro = ?intro.phase(),
        elapsed_ms = started.elapsed().as_millis(),
        "Replay finished"
    );

    drop(sequencer);
    drop(intro);
    printer.await?;

    Ok(())
}
