use futures::executor::block_on;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uidiff::planner::{PipelineError, PipelineRun, Planner};
use uidiff::{CompareConfig, Engine, GraphInput, IdMode, Source};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Compare(uidiff::Error),
    Pipeline(PipelineError),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Config(String),
}

impl CliError {
    fn is_missing_input(&self) -> bool {
        matches!(
            self,
            CliError::Compare(uidiff::Error::MissingInput { .. })
                | CliError::Pipeline(PipelineError::Compare(uidiff::Error::MissingInput { .. }))
        )
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Compare(err) => write!(f, "{err}"),
            CliError::Pipeline(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Yaml(err) => write!(f, "YAML error: {err}"),
            CliError::Config(msg) => write!(f, "Invalid config file: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<uidiff::Error> for CliError {
    fn from(value: uidiff::Error) -> Self {
        Self::Compare(value)
    }
}

impl From<PipelineError> for CliError {
    fn from(value: PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Compare,
    Graph,
    Match,
}

impl Command {
    fn as_str(self) -> &'static str {
        match self {
            Command::Compare => "compare",
            Command::Graph => "graph",
            Command::Match => "match",
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    inputs: Vec<String>,
    source: Option<Source>,
    pretty: bool,
    config: Option<String>,
    deterministic_ids: bool,
    project_root: Option<String>,
    out_dir: Option<String>,
}

fn usage() -> &'static str {
    "uidiff-cli\n\
\n\
USAGE:\n\
  uidiff-cli graph   [--source design|runtime] [--config <path>] [--deterministic-ids] [--pretty] [<path>|-]\n\
  uidiff-cli match   [--config <path>] [--deterministic-ids] [--pretty] <design> <runtime>\n\
  uidiff-cli compare [--config <path>] [--deterministic-ids] [--pretty] [--project-root <dir>] [--out-dir <dir>] <design> <runtime>\n\
\n\
NOTES:\n\
  - Inputs are JSON: a semantic graph, a detection list, or a UI tree with attributes.bounds.\n\
  - '-' reads one input from stdin; graph reads stdin when <path> is omitted.\n\
  - --config takes JSON, or YAML when the file ends in .yaml/.yml; values merge onto defaults.\n\
  - compare --out-dir writes step1..step4 JSON files into <dir>/<report_id>/.\n\
  - Set UIDIFF_TIMING=1 to print per-stage durations to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "graph" => args.command = Command::Graph,
            "match" => args.command = Command::Match,
            "compare" => args.command = Command::Compare,
            "--pretty" => args.pretty = true,
            "--deterministic-ids" => args.deterministic_ids = true,
            "--source" => {
                let Some(source) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.source = Some(
                    source
                        .parse::<Source>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--project-root" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.project_root = Some(dir.clone());
            }
            "--out-dir" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out_dir = Some(dir.clone());
            }
            "-" => args.inputs.push("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => args.inputs.push(path.to_string()),
        }
    }

    let expected = match args.command {
        Command::Graph => 0..=1,
        Command::Match | Command::Compare => 2..=2,
    };
    if !expected.contains(&args.inputs.len()) {
        return Err(CliError::Usage(usage()));
    }
    if args.inputs.iter().filter(|p| p.as_str() == "-").count() > 1 {
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

/// Blank input stays `null` so the engine reports it as missing.
fn read_side(input: &str, side: Source) -> Result<Value, CliError> {
    let text = read_input(Some(input))?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text)
        .map_err(|source| CliError::Compare(uidiff::Error::InputJson { side, source }))
}

fn load_config(path: &str) -> Result<CompareConfig, CliError> {
    let text = std::fs::read_to_string(path)?;
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let value: Value = if is_yaml {
        serde_yaml::from_str(&text)?
    } else {
        serde_json::from_str(&text)?
    };
    if !value.is_object() {
        return Err(CliError::Config(format!(
            "{path}: expected a mapping at the top level"
        )));
    }
    Ok(CompareConfig::from_value(value))
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn timing_enabled() -> bool {
    static ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    *ENABLED.get_or_init(|| match std::env::var("UIDIFF_TIMING").as_deref() {
        Ok("1") | Ok("true") => true,
        _ => false,
    })
}

/// Per-stage wall clock, reported on stderr when `UIDIFF_TIMING` is set.
struct StageTimer {
    command: &'static str,
    start: Option<Instant>,
    stages: Vec<(&'static str, Duration)>,
}

impl StageTimer {
    fn new(command: &'static str) -> Self {
        Self {
            command,
            start: timing_enabled().then(Instant::now),
            stages: Vec::new(),
        }
    }

    fn time<T>(&mut self, stage: &'static str, f: impl FnOnce() -> T) -> T {
        if self.start.is_none() {
            return f();
        }
        let start = Instant::now();
        let out = f();
        self.stages.push((stage, start.elapsed()));
        out
    }

    fn report(&self) {
        let Some(start) = self.start else {
            return;
        };
        let stages: Vec<String> = self
            .stages
            .iter()
            .map(|(name, d)| format!("{name}={d:?}"))
            .collect();
        eprintln!(
            "[uidiff-timing] command={} total={:?} {}",
            self.command,
            start.elapsed(),
            stages.join(" ")
        );
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let mut timer = StageTimer::new(args.command.as_str());

    let mut engine = Engine::new();
    if let Some(path) = &args.config {
        engine = engine.with_config(load_config(path)?);
    }
    if args.deterministic_ids {
        engine = engine.with_id_mode(IdMode::Sequential);
    }
    let mut ids = engine.id_generator();

    match args.command {
        Command::Graph => {
            let source = args.source.unwrap_or_default();
            let input = args.inputs.first().map(String::as_str);
            let text = timer.time("read", || read_input(input))?;
            let graph = timer.time("build", || -> Result<_, CliError> {
                let input = GraphInput::from_json_str(&text, source)?;
                Ok(engine.build_graph(&input, source, &mut ids)?)
            })?;
            write_json(&graph, args.pretty)?;
        }
        Command::Match => {
            let (design, runtime) = timer.time("read", || -> Result<_, CliError> {
                Ok((
                    read_side(&args.inputs[0], Source::Design)?,
                    read_side(&args.inputs[1], Source::Runtime)?,
                ))
            })?;
            let comparison = timer.time("compare", || {
                engine.compare_with_ids(&design, &runtime, &mut ids)
            })?;
            write_json(&comparison.matching, args.pretty)?;
        }
        Command::Compare => {
            let (design, runtime) = timer.time("read", || -> Result<_, CliError> {
                Ok((
                    read_side(&args.inputs[0], Source::Design)?,
                    read_side(&args.inputs[1], Source::Runtime)?,
                ))
            })?;
            let comparison = timer.time("compare", || {
                engine.compare_with_ids(&design, &runtime, &mut ids)
            })?;

            let mut planner = Planner::new();
            if let Some(root) = &args.project_root {
                planner = planner.with_project_root(PathBuf::from(root));
            }
            let blueprints = timer.time("plan", || {
                block_on(planner.plan_report(&comparison.report, &comparison.design, &mut ids))
            });
            let pipeline = PipelineRun {
                comparison,
                blueprints,
            };

            if let Some(out_dir) = &args.out_dir {
                timer.time("write", || {
                    if let Err(err) = pipeline.write_steps(Path::new(out_dir)) {
                        eprintln!("warning: {err}");
                    }
                });
            }
            write_json(&pipeline.output(), args.pretty)?;
        }
    }

    timer.report();
    Ok(())
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

    match run(args) {
        Ok(()) => {}
        Err(err) if err.is_missing_input() => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        std::iter::once("uidiff-cli")
            .chain(items.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn compare_is_the_default_command() {
        let args = parse_args(&argv(&["a.json", "b.json"])).unwrap();
        assert_eq!(args.command, Command::Compare);
        assert_eq!(args.inputs, ["a.json", "b.json"]);
    }

    #[test]
    fn flags_are_parsed() {
        let args = parse_args(&argv(&[
            "compare",
            "--pretty",
            "--deterministic-ids",
            "--config",
            "cfg.yaml",
            "--out-dir",
            "out",
            "--project-root",
            "web",
            "-",
            "b.json",
        ]))
        .unwrap();
        assert!(args.pretty && args.deterministic_ids);
        assert_eq!(args.config.as_deref(), Some("cfg.yaml"));
        assert_eq!(args.out_dir.as_deref(), Some("out"));
        assert_eq!(args.project_root.as_deref(), Some("web"));
        assert_eq!(args.inputs, ["-", "b.json"]);
    }

    #[test]
    fn wrong_arity_or_unknown_flags_are_usage_errors() {
        for items in [
            &["match", "only-one.json"][..],
            &["compare", "-", "-"],
            &["graph", "a.json", "b.json"],
            &["graph", "--source", "mockup"],
            &["compare", "--bogus", "a", "b"],
            &["compare", "a", "b", "--config"],
        ] {
            assert!(
                matches!(parse_args(&argv(items)), Err(CliError::Usage(_))),
                "{items:?}"
            );
        }
    }

    #[test]
    fn graph_accepts_stdin_and_source() {
        let args = parse_args(&argv(&["graph", "--source", "Design"])).unwrap();
        assert_eq!(args.command, Command::Graph);
        assert_eq!(args.source, Some(Source::Design));
        assert!(args.inputs.is_empty());
    }
}
