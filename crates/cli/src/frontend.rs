//! Argument parsing and process wiring for `rsync-filter`.

mod rule_sources;
mod walk;

#[cfg(test)]
mod tests;

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command, error::ErrorKind, value_parser};
use filters::{FilterError, FilterErrorKind, FilterScope};
use logging::{InfoFlag, VerbosityConfig, info_gte};

use rule_sources::{apply_rule_sources, collect_rule_sources};
use walk::{WalkError, WalkSummary, Walker};

/// Name used in diagnostics and `--version` output.
pub const PROGRAM_NAME: &str = "rsync-filter";

/// Errors in the command line or in a rule (rsync's `RERR_SYNTAX`).
pub const EXIT_SYNTAX: i32 = 1;
/// A rule file could not be read (rsync's `RERR_FILEIO`).
pub const EXIT_FILE_IO: i32 = 11;
/// Some entries could not be read during the walk (rsync's `RERR_PARTIAL`).
pub const EXIT_PARTIAL: i32 = 23;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

fn command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("List how rsync filter rules classify every entry below ROOT.")
        .arg(
            Arg::new("filter")
                .short('f')
                .long("filter")
                .value_name("RULE")
                .help("Add a filter RULE ('+', '-', 'P', 'R', 'merge', 'dir-merge', '!' ...).")
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("include")
                .long("include")
                .value_name("PATTERN")
                .help("Don't exclude entries matching PATTERN.")
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("PATTERN")
                .help("Exclude entries matching PATTERN.")
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("include-from")
                .long("include-from")
                .value_name("FILE")
                .help("Read include patterns from FILE.")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude-from")
                .long("exclude-from")
                .value_name("FILE")
                .help("Read exclude patterns from FILE.")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("rsync-filter")
                .short('F')
                .help("Same as --filter='dir-merge /.rsync-filter'; repeat to also exclude the .rsync-filter files.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("delete")
                .long("delete")
                .help("Also classify every entry for the deletion pass (P protected, R at risk).")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase verbosity.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Fine-grained informational verbosity (name, skip, del, stats).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Fine-grained debug verbosity (filter, flist, del).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Print filter statistics after the listing.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("root")
                .value_name("ROOT")
                .help("Directory to walk.")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
}

/// Runs the CLI with the provided arguments and output handles.
///
/// The first argument is the program name. Returns the process exit status.
pub fn run<I, T, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    let matches = match command().try_get_matches_from(args.iter()) {
        Ok(matches) => matches,
        Err(error) => {
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    match write!(stdout, "{}", error.render()) {
                        Ok(()) => 0,
                        Err(_) => EXIT_FILE_IO,
                    }
                }
                _ => {
                    let _ = write!(stderr, "{error}");
                    EXIT_SYNTAX
                }
            };
        }
    };

    match verbosity(&matches) {
        Ok(config) => {
            logging::init_tracing(config);
        }
        Err(message) => return fail(stderr, &message, EXIT_SYNTAX),
    }

    let root = matches
        .get_one::<PathBuf>("root")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    if !root.is_dir() {
        let message = format!("'{}' is not a directory", root.display());
        return fail(stderr, &message, EXIT_PARTIAL);
    }

    let mut root_scope = FilterScope::root(&root);
    let sources = collect_rule_sources(&args, &matches);
    if let Err(error) = apply_rule_sources(&mut root_scope, &sources) {
        return fail(stderr, &error.to_string(), filter_exit_code(&error));
    }

    let delete = matches.get_flag("delete");
    let summary = match Walker::new(stdout, stderr, delete).run(root_scope, &root) {
        Ok(summary) => summary,
        Err(WalkError::Filter(error)) => {
            return fail(stderr, &error.to_string(), filter_exit_code(&error));
        }
        Err(WalkError::Output(error)) => {
            return fail(stderr, &format!("failed to write listing: {error}"), EXIT_FILE_IO);
        }
    };

    if let Err(error) = print_stats(stdout, &summary) {
        return fail(stderr, &format!("failed to write statistics: {error}"), EXIT_FILE_IO);
    }

    if summary.io_errors > 0 {
        let message = format!(
            "some entries could not be read ({} errors)",
            summary.io_errors
        );
        return fail(stderr, &message, EXIT_PARTIAL);
    }
    0
}

fn verbosity(matches: &ArgMatches) -> Result<VerbosityConfig, String> {
    let mut config = VerbosityConfig::from_verbose_level(matches.get_count("verbose"));
    for list in matches.get_many::<String>("info").into_iter().flatten() {
        config.apply_info_flags(list)?;
    }
    for list in matches.get_many::<String>("debug").into_iter().flatten() {
        config.apply_debug_flags(list)?;
    }
    if matches.get_flag("stats") {
        config.info.stats = config.info.stats.max(2);
    }
    Ok(config)
}

const fn filter_exit_code(error: &FilterError) -> i32 {
    match error.kind() {
        FilterErrorKind::Syntax => EXIT_SYNTAX,
        FilterErrorKind::Resource => EXIT_FILE_IO,
    }
}

fn fail<Err: Write>(stderr: &mut Err, message: &str, code: i32) -> i32 {
    let _ = writeln!(stderr, "{PROGRAM_NAME} error: {message} (code {code})");
    code
}

fn print_stats<Out: Write>(stdout: &mut Out, summary: &WalkSummary) -> std::io::Result<()> {
    let tracer = &summary.tracer;
    tracer.summary();

    if info_gte(InfoFlag::Stats, 1) {
        writeln!(
            stdout,
            "{} entries: {} included, {} excluded",
            tracer.total_evaluated(),
            tracer.total_included() + tracer.total_neutral(),
            tracer.total_excluded()
        )?;
    }
    if info_gte(InfoFlag::Stats, 2) {
        writeln!(stdout, "Filter rules: {}", tracer.rules_added())?;
        writeln!(stdout, "Per-directory rule files: {}", tracer.dir_merges())?;
        writeln!(stdout, "Matched no rule: {}", tracer.total_neutral())?;
        writeln!(stdout, "Pass ratio: {:.1}%", tracer.pass_ratio() * 100.0)?;
    }
    Ok(())
}

fn clamp_status(status: i32) -> u8 {
    u8::try_from(status.clamp(0, MAX_EXIT_CODE)).unwrap_or(u8::MAX)
}

/// Maps a status returned by [`run`] onto a process exit code.
#[must_use]
pub fn exit_code_from(status: i32) -> ExitCode {
    ExitCode::from(clamp_status(status))
}
