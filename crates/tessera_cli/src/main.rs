//! Tessera CLI
//!
//! Render widgets from JSON property files and replay interaction timelines
//! on a virtual clock.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tessera_core::{
    ChannelTransport, EventReceiver, FieldKind, FieldValue, PropertyChange, SharedModel,
    TesseraConfig, TimerScheduler, WidgetEvent, WidgetModel,
};
use tessera_theme::{ColorScheme, ThemeState};
use tessera_widgets::{lookup, widgets, AnyWidget, RenderNode, ViewContext, WidgetContext};

mod script;

use script::Action;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tessera widget CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (tessera.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Render with the dark palette
    #[arg(long, global = true)]
    dark: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a widget's render tree as JSON
    Render {
        /// Widget name (e.g. icon_button)
        widget: String,

        /// JSON object with initial field values
        #[arg(short, long)]
        props: Option<PathBuf>,
    },

    /// Replay an interaction timeline against a widget
    Simulate {
        /// Widget name
        widget: String,

        /// JSON object with initial field values
        #[arg(short, long)]
        props: Option<PathBuf>,

        /// Steps such as "click@0,click@500,tick@1001"
        #[arg(short, long)]
        script: String,
    },

    /// List available widgets and their fields
    Widgets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let scheme = if cli.dark {
        ColorScheme::Dark
    } else {
        ColorScheme::Light
    };

    match cli.command {
        Commands::Render { widget, props } => cmd_render(&widget, props.as_deref(), config, scheme),
        Commands::Simulate {
            widget,
            props,
            script,
        } => cmd_simulate(&widget, props.as_deref(), &script, config, scheme),
        Commands::Widgets => cmd_widgets(),
    }
}

fn load_config(path: Option<&Path>) -> Result<TesseraConfig> {
    match path {
        Some(path) => {
            let config = TesseraConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(TesseraConfig::default()),
    }
}

fn load_props(path: Option<&Path>) -> Result<Vec<(String, FieldValue)>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read props from {}", path.display()))?;
    let value: FieldValue = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse props in {}", path.display()))?;
    match value {
        FieldValue::Object(map) => Ok(map.into_iter().collect()),
        other => bail!(
            "props file must hold a JSON object, got {}",
            FieldKind::describe(&other)
        ),
    }
}

/// A mounted widget with its clock and backend channel
struct Session {
    scheduler: TimerScheduler,
    events: EventReceiver,
    model: Rc<WidgetModel>,
    widget: Box<dyn AnyWidget>,
}

impl Session {
    fn mount(
        name: &str,
        props: Option<&Path>,
        config: TesseraConfig,
        scheme: ColorScheme,
    ) -> Result<Self> {
        let info = lookup(name)?;
        let values = load_props(props)?;

        let scheduler = TimerScheduler::new();
        let (transport, events) = ChannelTransport::new();
        let ctx = WidgetContext::new(scheduler.handle(), Rc::new(transport))
            .with_theme(ThemeState::shared(scheme))
            .with_config(config);

        let model = Rc::new(
            WidgetModel::with_values(format!("{}-1", info.name), (info.schema)(), values)
                .with_context(|| format!("Invalid props for {}", info.name))?,
        );
        let shared: SharedModel = model.clone();
        let widget = info.mount(&shared, &ctx)?;
        info!("Mounted {} ({} fields)", info.name, model.snapshot().len());

        Ok(Self {
            scheduler,
            events,
            model,
            widget,
        })
    }

    fn render(&self) -> RenderNode {
        self.widget.render_view(&ViewContext::new())
    }

    fn drain_events(&mut self) -> Vec<WidgetEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn cmd_render(
    widget: &str,
    props: Option<&Path>,
    config: TesseraConfig,
    scheme: ColorScheme,
) -> Result<()> {
    let session = Session::mount(widget, props, config, scheme)?;
    print_json(&session.render())
}

#[derive(Serialize)]
struct StepReport {
    at_ms: u128,
    action: String,
    timers_fired: usize,
    events: Vec<WidgetEvent>,
    changes: Vec<PropertyChange>,
    tree: RenderNode,
}

fn cmd_simulate(
    widget: &str,
    props: Option<&Path>,
    script: &str,
    config: TesseraConfig,
    scheme: ColorScheme,
) -> Result<()> {
    let steps = script::parse(script).context("Invalid script")?;
    let mut session = Session::mount(widget, props, config, scheme)?;
    info!("Replaying {} steps", steps.len());

    let mut reports = Vec::with_capacity(steps.len());
    for step in steps {
        let timers_fired = session.scheduler.advance_to(step.at);
        if let Action::Interact(interaction) = &step.action {
            session
                .widget
                .handle_interaction(interaction)
                .with_context(|| format!("'{}' failed at {}ms", step.action.label(), step.at.as_millis()))?;
        }
        session.widget.consume_dirty();

        reports.push(StepReport {
            at_ms: step.at.as_millis(),
            action: step.action.label(),
            timers_fired,
            events: session.drain_events(),
            changes: session.model.drain_outbound(),
            tree: session.render(),
        });
    }

    let pending = session.scheduler.pending_count();
    if pending > 0 {
        let next = session.scheduler.next_deadline().unwrap_or(Duration::ZERO);
        info!(
            "{} timer(s) still pending, next at {}ms",
            pending,
            next.as_millis()
        );
    }
    session.widget.teardown();

    print_json(&reports)
}

fn cmd_widgets() -> Result<()> {
    for info in widgets() {
        println!("{}", info.name);
        println!("  interactions: {}", info.interactions.join(", "));
        for (name, spec) in (info.schema)().fields() {
            let nullable = if spec.nullable { "?" } else { "" };
            println!("  {name}: {}{nullable} = {}", spec.kind, spec.default);
        }
    }
    Ok(())
}
