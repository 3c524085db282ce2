use clap::Parser;

/// Vote tally for assemblies electing several positions.
///
/// Commands are read line by line from the standard input (or from --input).
/// Type `help` for the list of commands.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the initial positions and candidates.
    /// Without it, the tally starts with the default positions.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) A file with the commands to run, one per line. The standard
    /// input is read if not provided.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of all the positions will be written
    /// in JSON format to the given location after the last command.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, votacao will
    /// check that the final summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (directory, default: current directory) Where the `report` command writes the PDF files.
    #[clap(long, value_parser)]
    pub report_dir: Option<String>,

    /// If passed as an argument, the active position is not printed again after every change.
    #[clap(long, takes_value = false)]
    pub quiet: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
