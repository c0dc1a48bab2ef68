use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stategraph_core::{
    AnnotationWarning, Graph, HighlightStates, OpacityMap, StateStatsMap, VersionSnapshot,
    VizConfig, diff_versions,
};
use stategraph_render::{
    Layout, RenderContext, RenderOptions, SvgRenderOptions, render_scene, render_scene_svg,
};
use std::io::Read;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Model(stategraph_core::Error),
    Render(stategraph_render::Error),
    Json(serde_json::Error),
    Input(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Model(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Input(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<stategraph_core::Error> for CliError {
    fn from(value: stategraph_core::Error) -> Self {
        Self::Model(value)
    }
}

impl From<stategraph_render::Error> for CliError {
    fn from(value: stategraph_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Validate,
    Layout,
    #[default]
    Render,
    Diff,
}

#[derive(Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Svg,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    inputs: Vec<String>,
    format: OutputFormat,
    config: Option<String>,
    diagram_id: Option<String>,
    reachability: bool,
    pretty: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "stategraph-cli\n\
\n\
USAGE:\n\
  stategraph-cli validate [--config <path>] [<path>|-]\n\
  stategraph-cli layout [--pretty] [--config <path>] [--out <path>] [<path>|-]\n\
  stategraph-cli [render] [--format svg|json] [--pretty] [--config <path>] [--id <svg-id>] [--reachability] [--out <path>] [<path>|-]\n\
  stategraph-cli diff [--format svg|json] [--pretty] [--config <path>] [--id <svg-id>] [--out <path>] <old> <new>\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON object: {nodes, links, initStateId} plus optional nodeFillColor,\n\
    forbidNodeDeletion, opacityMap, highlightStates and stateStats.\n\
  - --config deep-merges a JSON object onto the default visualization settings.\n\
  - --reachability recomputes the reachability flags before rendering.\n\
  - diff reads two version snapshots {initStateName, states, links} and colors states by change.\n\
  - Annotation warnings are printed to stderr; they never fail the command.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "validate" => args.command = Command::Validate,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "diff" => args.command = Command::Diff,
            "--pretty" => args.pretty = true,
            "--reachability" => args.reachability = true,
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = fmt
                    .parse::<OutputFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "-" => args.inputs.push("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => args.inputs.push(path.to_string()),
        }
    }

    let expected = match args.command {
        Command::Diff => 2..=2,
        _ => 0..=1,
    };
    if !expected.contains(&args.inputs.len()) {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String, CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    Ok(text)
}

fn load_config(path: Option<&str>) -> Result<VizConfig, CliError> {
    let Some(path) = path else {
        return Ok(VizConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let overrides: Value = serde_json::from_str(&text)?;
    if !overrides.is_object() {
        return Err(CliError::Input(format!(
            "config `{path}` must be a JSON object"
        )));
    }
    Ok(VizConfig::default().merged_with(&overrides)?)
}

fn optional_field<T: DeserializeOwned>(doc: &Value, key: &str) -> Result<Option<T>, CliError> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|err| CliError::Input(format!("`{key}`: {err}"))),
    }
}

/// Splits the input document into the graph and the per-render options.
fn parse_document(
    text: &str,
    warnings: &mut Vec<AnnotationWarning>,
) -> Result<(Graph, RenderOptions), CliError> {
    let doc: Value = serde_json::from_str(text)?;
    if !doc.is_object() {
        return Err(CliError::Input("expected a JSON object".to_string()));
    }
    let graph = Graph::from_json_str(text)?;

    let opacity_map = match doc.get("opacityMap") {
        None | Some(Value::Null) => None,
        Some(v) => Some(OpacityMap::from_json(v, warnings)?),
    };
    let highlight_states = match doc.get("highlightStates") {
        None | Some(Value::Null) => None,
        Some(v) => Some(HighlightStates::from_json(v, warnings)?),
    };

    let options = RenderOptions {
        node_fill_color: optional_field(&doc, "nodeFillColor")?,
        opacity_map,
        forbid_node_deletion: optional_field(&doc, "forbidNodeDeletion")?.unwrap_or(false),
        highlight_states,
        state_stats: optional_field::<StateStatsMap>(&doc, "stateStats")?,
    };
    Ok((graph, options))
}

fn report_warnings(warnings: &[AnnotationWarning]) {
    for w in warnings {
        eprintln!("warning: {w}");
    }
}

fn run_diff(args: Args, config: VizConfig) -> Result<(), CliError> {
    let old: VersionSnapshot = serde_json::from_str(&read_input(Some(args.inputs[0].as_str()))?)?;
    let new: VersionSnapshot = serde_json::from_str(&read_input(Some(args.inputs[1].as_str()))?)?;
    let diff = diff_versions(&old, &new)?;

    let text = match args.format {
        OutputFormat::Json => to_json(&diff, args.pretty)?,
        OutputFormat::Svg => {
            let ctx = RenderContext::new(config);
            let resolved = diff.graph.validate(&ctx.config)?;
            let layout = Layout::for_graph(&resolved, &ctx.config);
            let options = RenderOptions {
                highlight_states: Some(diff.highlight.clone()),
                forbid_node_deletion: true,
                ..RenderOptions::default()
            };
            let out = render_scene(&resolved, &layout, &options, &ctx)?;
            report_warnings(&out.warnings);
            let svg_opts = SvgRenderOptions {
                diagram_id: args.diagram_id.clone(),
                ..SvgRenderOptions::default()
            };
            render_scene_svg(&out.scene, &svg_opts)
        }
    };
    write_text(&text, args.out.as_deref())
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Diff => run_diff(args, config),
        Command::Validate | Command::Layout | Command::Render => run_graph(args, config),
    }
}

fn run_graph(args: Args, config: VizConfig) -> Result<(), CliError> {
    let text = read_input(args.inputs.first().map(String::as_str))?;

    let mut warnings = Vec::new();
    let (mut graph, options) = parse_document(&text, &mut warnings)?;
    if args.reachability {
        graph = graph.with_reachability(&config)?;
    }

    let ctx = RenderContext::new(config);
    let resolved = graph.validate(&ctx.config)?;

    match args.command {
        Command::Validate => {
            report_warnings(&warnings);
            println!("ok");
            Ok(())
        }
        Command::Layout => {
            report_warnings(&warnings);
            let layout = Layout::for_graph(&resolved, &ctx.config);
            write_text(&to_json(&layout, args.pretty)?, args.out.as_deref())
        }
        Command::Render | Command::Diff => {
            let layout = Layout::for_graph(&resolved, &ctx.config);
            let out = render_scene(&resolved, &layout, &options, &ctx)?;
            warnings.extend(out.warnings);
            report_warnings(&warnings);

            let text = match args.format {
                OutputFormat::Svg => {
                    let svg_opts = SvgRenderOptions {
                        diagram_id: args.diagram_id,
                        ..SvgRenderOptions::default()
                    };
                    render_scene_svg(&out.scene, &svg_opts)
                }
                OutputFormat::Json => to_json(&out.scene, args.pretty)?,
            };
            write_text(&text, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
