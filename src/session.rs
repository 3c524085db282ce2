use log::{debug, info, warn};

use vote_tally::guidance::guidance_for;
use vote_tally::ranking::rank_candidates;
use vote_tally::report::{build_report, format_percentage, report_file_name};
use vote_tally::*;

use snafu::{prelude::*, Snafu};

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::session::commands::{parse_command, Command, ViewCommand};
use crate::session::config_reader::*;

pub mod commands;
pub mod view;

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile { source: std::io::Error, path: String },
    #[snafu(display("Error parsing the JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid configuration for {name:?}: {source}"))]
    InvalidSeed { source: TallyErrors, name: String },
    #[snafu(display("Error reading the commands"))]
    ReadingInput { source: std::io::Error },
    #[snafu(display("Error writing to {path}"))]
    Writing { source: std::io::Error, path: String },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SessionResult<T> = Result<T, SessionError>;

pub mod config_reader {
    use crate::session::*;
    use serde::{Deserialize, Serialize};
    use snafu::prelude::*;
    use vote_tally::builder::Builder;

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct SeedCandidate {
        pub name: String,
        pub votes: Option<u64>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct SeedPosition {
        pub name: String,
        #[serde(default)]
        pub candidates: Vec<SeedCandidate>,
    }

    /// The initial positions and candidates of a session.
    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct SeedConfig {
        pub positions: Vec<SeedPosition>,
        #[serde(rename = "activePosition")]
        pub active_position: Option<String>,
    }

    pub fn read_seed(path: &str) -> SessionResult<SeedConfig> {
        let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
        let config: SeedConfig =
            serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
        debug!("read_seed: {:?}", config);
        Ok(config)
    }

    /// The positions used when no configuration is given.
    pub fn default_seed() -> SeedConfig {
        let candidate = |name: &str| SeedCandidate {
            name: name.to_string(),
            votes: None,
        };
        SeedConfig {
            positions: vec![
                SeedPosition {
                    name: "Diácono".to_string(),
                    candidates: vec![
                        candidate("João Silva"),
                        candidate("Maria Santos"),
                        candidate("Pedro Oliveira"),
                    ],
                },
                SeedPosition {
                    name: "Presbítero".to_string(),
                    candidates: vec![],
                },
            ],
            active_position: None,
        }
    }

    pub fn build_state(config: &SeedConfig) -> SessionResult<TallyState> {
        if config.positions.is_empty() {
            warn!("build_state: the configuration does not contain any position");
        }
        let mut builder = Builder::new();
        let active_name = config.active_position.as_deref().map(str::trim);
        let mut found_active = false;
        for sp in config.positions.iter() {
            builder = builder.position(&sp.name).context(InvalidSeedSnafu {
                name: sp.name.clone(),
            })?;
            for sc in sp.candidates.iter() {
                builder = builder
                    .candidate(&sc.name, sc.votes.unwrap_or(0))
                    .context(InvalidSeedSnafu {
                        name: sc.name.clone(),
                    })?;
            }
            if !found_active && active_name == Some(sp.name.trim()) {
                builder = builder.active();
                found_active = true;
            }
        }
        if let Some(active) = config.active_position.as_ref() {
            if !found_active {
                whatever!("Unknown active position {:?}", active);
            }
        }
        Ok(builder.build())
    }
}

/// What to do after a command.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Flow {
    Continue,
    Stop,
}

/// The view layer: it holds the current snapshot and dispatches the commands.
pub struct Session {
    state: TallyState,
    report_dir: PathBuf,
    quiet: bool,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn emit<W: Write>(out: &mut W, text: &str) -> SessionResult<()> {
    writeln!(out, "{}", text).context(WritingSnafu { path: "output" })
}

impl Session {
    pub fn new(state: TallyState, report_dir: PathBuf) -> Session {
        Session {
            state,
            report_dir,
            quiet: false,
            clock: local_now,
        }
    }

    pub fn state(&self) -> &TallyState {
        &self.state
    }

    /// Runs all the commands of the input, until the end or a `quit` command.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> SessionResult<()> {
        for line_r in input.lines() {
            let line = line_r.context(ReadingInputSnafu {})?;
            if self.handle_line(&line, out)? == Flow::Stop {
                break;
            }
        }
        Ok(())
    }

    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> SessionResult<Flow> {
        let cmd = match parse_command(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                emit(out, &e.to_string())?;
                return Ok(Flow::Continue);
            }
        };
        debug!("handle_line: {:?}", cmd);
        match cmd {
            Command::View(ViewCommand::Quit) => return Ok(Flow::Stop),
            Command::View(ViewCommand::Help) => emit(out, view::HELP)?,
            Command::View(ViewCommand::Show) => emit(out, &view::render_active(&self.state))?,
            Command::View(ViewCommand::Positions) => {
                emit(out, &view::render_positions(&self.state))?
            }
            Command::View(ViewCommand::Ranking) => {
                let report = build_report(&self.state.positions, (self.clock)());
                emit(out, report.to_text().trim_end())?
            }
            Command::View(ViewCommand::Info) => {
                let text = match self.state.active_position() {
                    Some(p) => match guidance_for(&p.name) {
                        Some(g) => g.to_text().trim_end().to_string(),
                        None => format!("Nenhuma informação disponível para o cargo {}", p.name),
                    },
                    None => view::NO_POSITION.to_string(),
                };
                emit(out, &text)?
            }
            Command::View(ViewCommand::Report(dir)) => {
                let path = self.export_report(dir)?;
                emit(out, &format!("PDF gerado com sucesso: {}", path.display()))?
            }
            cmd => self.dispatch(cmd, out)?,
        }
        Ok(Flow::Continue)
    }

    fn dispatch<W: Write>(&mut self, cmd: Command, out: &mut W) -> SessionResult<()> {
        let action = match self.to_action(cmd) {
            Some(action) => action,
            None => return emit(out, view::NO_POSITION),
        };
        let (next, notice) = reduce_with_notice(&self.state, &action);
        self.state = next;
        // Ignored actions are silent.
        if let Some(notice) = notice {
            emit(out, &notice.to_string())?;
            if !self.quiet {
                emit(out, &view::render_active(&self.state))?;
            }
        }
        Ok(())
    }

    /// The action corresponding to a command. Candidate commands need an active
    /// position.
    fn to_action(&self, cmd: Command) -> Option<Action> {
        match cmd {
            Command::PositionAdd(name) => return Some(Action::AddPosition { name }),
            Command::PositionSelect(position_id) => {
                return Some(Action::SelectPosition { position_id })
            }
            Command::PositionDelete(position_id) => {
                return Some(Action::DeletePosition { position_id })
            }
            _ => {}
        }
        let position_id = self.state.active_position()?.id.clone();
        let action = match cmd {
            Command::Vote(candidate_id) => Action::AddVote {
                position_id,
                candidate_id,
            },
            Command::Unvote(candidate_id) => Action::RemoveVote {
                position_id,
                candidate_id,
            },
            Command::Add(name) => Action::AddCandidate { position_id, name },
            Command::Rename { id, name } => Action::EditCandidateName {
                position_id,
                candidate_id: id,
                name,
            },
            Command::Delete(candidate_id) => Action::DeleteCandidate {
                position_id,
                candidate_id,
            },
            Command::Reset => Action::ResetVotes { position_id },
            Command::PositionRename(name) => Action::EditPositionName { position_id, name },
            Command::PositionAdd(_)
            | Command::PositionSelect(_)
            | Command::PositionDelete(_)
            | Command::View(_) => return None,
        };
        Some(action)
    }

    /// Writes the PDF report of all the positions and returns its path.
    pub fn export_report(&self, dir: Option<String>) -> SessionResult<PathBuf> {
        let now = (self.clock)();
        let report = build_report(&self.state.positions, now);
        let dir = dir.map(PathBuf::from).unwrap_or_else(|| self.report_dir.clone());
        let path = dir.join(report_file_name(now.date()));
        fs::write(&path, report.to_pdf()).context(WritingSnafu {
            path: path.display().to_string(),
        })?;
        info!("Report written to {}", path.display());
        Ok(path)
    }
}

/// The summary of all the positions, in JSON format.
pub fn build_summary_js(state: &TallyState) -> JSValue {
    let positions: Vec<JSValue> = state
        .positions
        .iter()
        .map(|p| {
            let total = p.total_votes();
            let ranking: Vec<JSValue> = rank_candidates(&p.candidates)
                .iter()
                .map(|r| {
                    json!({
                        "place": r.place,
                        "id": r.candidate.id,
                        "name": r.candidate.name,
                        "votes": r.candidate.votes,
                        "percentage": format_percentage(r.candidate.votes, total),
                        "tied": r.tied,
                    })
                })
                .collect();
            json!({
                "id": p.id,
                "name": p.name,
                "totalVotes": total,
                "ranking": ranking,
            })
        })
        .collect();
    json!({
        "activePosition": state.active_position().map(|p| p.name.clone()),
        "positions": positions,
    })
}

pub fn read_summary(path: &str) -> SessionResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

/// Compares a summary with a reference summary, and prints the differences.
pub fn check_summary(pretty_js_stats: &str, reference_path: &str) -> SessionResult<()> {
    let summary_ref = read_summary(reference_path)?;
    info!("reference summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between the final summary and the reference summary")
    }
    Ok(())
}

pub fn run_session(args: &Args) -> SessionResult<()> {
    let seed = match args.config.as_deref() {
        Some(path) => read_seed(path)?,
        None => default_seed(),
    };
    let state = build_state(&seed)?;
    info!(
        "Starting with {} positions and {} votes",
        state.positions.len(),
        state.total_votes()
    );

    let report_dir = PathBuf::from(args.report_dir.clone().unwrap_or_else(|| ".".to_string()));
    let mut session = Session::new(state, report_dir);
    session.quiet = args.quiet;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit(&mut out, &view::render_active(session.state()))?;
    match args.input.as_deref() {
        Some(path) => {
            let f = File::open(path).context(OpeningFileSnafu { path })?;
            session.run(BufReader::new(f), &mut out)?;
        }
        None => {
            let stdin = io::stdin();
            session.run(stdin.lock(), &mut out)?;
        }
    }

    let summary = build_summary_js(session.state());
    let pretty_js_stats = serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;
    match args.out.as_deref() {
        Some("stdout") => emit(&mut out, &pretty_js_stats)?,
        Some(path) if !path.is_empty() => {
            fs::write(path, &pretty_js_stats).context(WritingSnafu { path })?;
            info!("Summary written to {}", path);
        }
        _ => {}
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = args.reference.as_deref() {
        check_summary(&pretty_js_stats, reference_path)?;
    }
    Ok(())
}
