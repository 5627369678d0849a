//! Command handlers
//!
//! Each command loads a fixture, drives the engine and hands the result to
//! the [`Printer`]. The engine-facing half of every command is a plain
//! function returning data so it can be tested without a terminal.

use locsmith::{
    ActionVerb, ClickEvent, DescriptorExtractor, Dialect, Document, DomTree, ElementDescriptor,
    EngineConfig, EngineEvent, EventLog, ExportFormat, FrameTicket, NodeId, PageScanner,
    PreviewEntry, Request, Session, SnippetFormatter, Synthesizer,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::commands::{LocateArgs, PickArgs, PreviewArgs, ScanArgs, SnippetArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, Printer};

/// Load a JSON DOM fixture
pub fn load_fixture(path: &Path) -> CliResult<Document> {
    let doc = Document::from_json_file(path)
        .map_err(|err| CliError::fixture(path.display().to_string(), err))?;
    debug!(path = %path.display(), elements = doc.elements().len(), "fixture loaded");
    Ok(doc)
}

/// Element matched by `selector`, or the fixture's active element
pub fn resolve_target(doc: &Document, selector: Option<&str>) -> CliResult<NodeId> {
    match selector {
        Some(selector) => doc
            .query_selector(selector)?
            .ok_or_else(|| CliError::target_not_found(format!("no element matches '{selector}'"))),
        None => doc.active_element().ok_or_else(|| {
            CliError::target_not_found("fixture has no active element; pass --target")
        }),
    }
}

/// Everything the engine derives for one element
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateReport {
    /// Structural locator
    pub locator: String,
    /// Whether the locator resolved to exactly one element
    pub unique: bool,
    /// Absolute XPath
    pub absolute: String,
    /// Element descriptor
    pub descriptor: Option<ElementDescriptor>,
    /// Strategy snippets per dialect
    pub preview: Vec<PreviewEntry>,
}

/// Synthesize, describe and format `node`
pub fn locate(
    engine: &EngineConfig,
    doc: &Document,
    node: NodeId,
    dialects: &[Dialect],
) -> CliResult<LocateReport> {
    let synthesizer = Synthesizer::new(engine);
    let locator = synthesizer
        .structural(doc, node)
        .ok_or_else(|| CliError::target_not_found("target is not an element"))?;
    let absolute = synthesizer
        .absolute(doc, node)
        .map(|path| path.into_string())
        .unwrap_or_default();
    let descriptor = DescriptorExtractor::new(engine).describe(doc, node, locator.as_str());
    let preview = SnippetFormatter::new(engine).preview(doc, Some(node), locator.as_str(), dialects);
    Ok(LocateReport {
        unique: locator.is_unique(),
        locator: locator.into_string(),
        absolute,
        descriptor,
        preview,
    })
}

/// Run the locate command
pub fn run_locate(config: &CliConfig, args: &LocateArgs) -> CliResult<()> {
    let doc = load_fixture(&args.fixture)?;
    let node = resolve_target(&doc, args.target.as_deref())?;
    let dialects = if args.dialects.is_empty() {
        config.engine.preview_dialects.clone()
    } else {
        args.dialects.clone()
    };
    let report = locate(&config.engine, &doc, node, &dialects)?;

    let printer = Printer::from_config(config);
    if config.output == OutputFormat::Json {
        return printer.json(&report);
    }
    printer.heading("Locator")?;
    printer.field("structural", &report.locator)?;
    printer.field("unique", if report.unique { "yes" } else { "no (best effort)" })?;
    printer.field("absolute", &report.absolute)?;
    if let Some(descriptor) = &report.descriptor {
        print_descriptor(&printer, descriptor)?;
    }
    printer.heading("Snippets")?;
    for entry in &report.preview {
        printer.snippet(entry.dialect.label(), &entry.snippet)?;
    }
    Ok(())
}

/// Render a stored locator.
///
/// With an action the action template is used; otherwise the strategy form
/// when a fixture supplies the element, else the passive form.
pub fn render_snippet(engine: &EngineConfig, args: &SnippetArgs) -> CliResult<String> {
    let formatter = SnippetFormatter::new(engine);
    if let Some(action) = args.action.as_deref() {
        let verb = ActionVerb::parse_lenient(action);
        return Ok(formatter.action(&args.locator, args.dialect, verb));
    }
    let Some(path) = &args.fixture else {
        return Ok(formatter.passive(&args.locator, args.dialect));
    };
    let doc = load_fixture(path)?;
    let element = match args.target.as_deref() {
        Some(selector) => Some(resolve_target(&doc, Some(selector))?),
        None => doc.active_element().or_else(|| doc.body()),
    };
    Ok(formatter.strategy(&args.locator, args.dialect, &doc, element))
}

/// Run the snippet command
pub fn run_snippet(config: &CliConfig, args: &SnippetArgs) -> CliResult<()> {
    let snippet = render_snippet(&config.engine, args)?;
    let printer = Printer::from_config(config);
    if config.output == OutputFormat::Json {
        return printer.json(&serde_json::json!({
            "dialect": args.dialect,
            "action": args.action.as_deref().map(ActionVerb::parse_lenient),
            "snippet": snippet,
        }));
    }
    if snippet.is_empty() {
        return printer.warning("empty locator renders no snippet");
    }
    printer.line(&snippet)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DialectInfo {
    id: &'static str,
    label: &'static str,
    semantic: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerbInfo {
    id: &'static str,
    label: &'static str,
    needs_target: bool,
}

/// Run the dialects command
pub fn run_dialects(config: &CliConfig) -> CliResult<()> {
    let dialects: Vec<DialectInfo> = Dialect::ALL
        .iter()
        .map(|dialect| DialectInfo {
            id: dialect.as_str(),
            label: dialect.label(),
            semantic: dialect.is_semantic(),
        })
        .collect();
    let verbs: Vec<VerbInfo> = ActionVerb::ALL
        .iter()
        .map(|verb| VerbInfo {
            id: verb.as_str(),
            label: verb.label(),
            needs_target: verb.needs_target(),
        })
        .collect();

    let printer = Printer::from_config(config);
    if config.output == OutputFormat::Json {
        return printer.json(&serde_json::json!({ "dialects": dialects, "actions": verbs }));
    }
    printer.heading("Dialects")?;
    for info in &dialects {
        printer.line(&format!("  {:<18} {}", info.id, info.label))?;
    }
    printer.heading("Actions")?;
    for info in &verbs {
        printer.line(&format!("  {:<12} {}", info.id, info.label))?;
    }
    Ok(())
}

/// Arm the picker, hover `hover` in order and click `click`
pub fn replay_pick(
    engine: &EngineConfig,
    doc: &mut Document,
    hover: &[String],
    click: &str,
) -> CliResult<Vec<EngineEvent>> {
    let mut session = Session::new(engine.clone(), EventLog::new());
    session.handle(doc, Request::StartPickSelector);
    for selector in hover {
        let node = resolve_target(doc, Some(selector))?;
        session.on_pointer_move(doc, node);
    }
    let target = resolve_target(doc, Some(click))?;
    let mut event = ClickEvent::new(target);
    session.on_click(doc, &mut event);
    Ok(session.into_observer().drain())
}

/// Run the pick command
pub fn run_pick(config: &CliConfig, args: &PickArgs) -> CliResult<()> {
    let mut doc = load_fixture(&args.fixture)?;
    let events = replay_pick(&config.engine, &mut doc, &args.hover, &args.click)?;
    info!(events = events.len(), "pick replayed");
    print_events(config, &events)
}

/// Start the live preview and hover `hover` in order.
///
/// Without `burst` every move gets its own animation frame; with it all
/// moves land before the frames run, so only the latest survives.
pub fn replay_preview(
    engine: &EngineConfig,
    doc: &mut Document,
    hover: &[String],
    burst: bool,
) -> CliResult<Vec<EngineEvent>> {
    let targets = hover
        .iter()
        .map(|selector| resolve_target(doc, Some(selector)))
        .collect::<CliResult<Vec<_>>>()?;
    let mut session = Session::new(engine.clone(), EventLog::new());
    session.handle(doc, Request::StartLivePreview);

    let mut tickets: Vec<FrameTicket> = Vec::new();
    for node in targets {
        let Some(ticket) = session.on_pointer_move(doc, node) else {
            continue;
        };
        if burst {
            tickets.push(ticket);
        } else {
            session.on_animation_frame(&*doc, ticket);
        }
    }
    for ticket in tickets {
        session.on_animation_frame(&*doc, ticket);
    }
    Ok(session.into_observer().drain())
}

/// Run the preview command
pub fn run_preview(config: &CliConfig, args: &PreviewArgs) -> CliResult<()> {
    let mut doc = load_fixture(&args.fixture)?;
    let events = replay_preview(&config.engine, &mut doc, &args.hover, args.burst)?;
    print_events(config, &events)?;
    if config.output == OutputFormat::Text {
        Printer::from_config(config).success(&format!(
            "{} frame(s) from {} move(s)",
            events.len(),
            args.hover.len()
        ))?;
    }
    Ok(())
}

/// Run the scan command
pub fn run_scan(config: &CliConfig, args: &ScanArgs) -> CliResult<()> {
    let doc = load_fixture(&args.fixture)?;
    let cases = PageScanner::new(&config.engine).scan(&doc);
    let format = if config.output == OutputFormat::Json {
        ExportFormat::Json
    } else {
        args.format
    };
    let rendered = format.render(&cases)?;

    let printer = Printer::from_config(config);
    if cases.is_empty() {
        printer.warning("no test cases suggested for this page")?;
    }
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            printer.success(&format!(
                "wrote {} case(s) as {format} to {}",
                cases.len(),
                path.display()
            ))
        }
        None => printer.line(&rendered),
    }
}

fn print_descriptor(printer: &Printer, descriptor: &ElementDescriptor) -> CliResult<()> {
    printer.heading("Descriptor")?;
    let classes = descriptor.classes.join(" ");
    let fields = [
        ("tag", descriptor.tag.as_str()),
        ("id", descriptor.id.as_str()),
        ("classes", classes.as_str()),
        ("name", descriptor.name.as_str()),
        ("role", descriptor.role.as_str()),
        ("accessible name", descriptor.accessible_name.as_str()),
        ("placeholder", descriptor.placeholder.as_str()),
        ("type", descriptor.input_type.as_str()),
        ("test id", descriptor.test_id.as_str()),
        ("text", descriptor.text.as_str()),
        ("frame", descriptor.frame.as_str()),
    ];
    for (label, value) in fields.into_iter().filter(|(_, value)| !value.is_empty()) {
        printer.field(label, value)?;
    }
    Ok(())
}

fn print_events(config: &CliConfig, events: &[EngineEvent]) -> CliResult<()> {
    let printer = Printer::from_config(config);
    if config.output == OutputFormat::Json {
        return printer.json(events);
    }
    for event in events {
        match event {
            EngineEvent::SelectorPicked(result) => {
                printer.heading("Picked")?;
                printer.field("locator", &result.locator)?;
                if let Some(descriptor) = &result.descriptor {
                    print_descriptor(&printer, descriptor)?;
                }
            }
            EngineEvent::LivePreviewUpdate { preview } => {
                printer.heading(&format!("Preview {}", preview.locator))?;
                for entry in &preview.preview {
                    printer.snippet(entry.dialect.label(), &entry.snippet)?;
                }
            }
        }
    }
    Ok(())
}
