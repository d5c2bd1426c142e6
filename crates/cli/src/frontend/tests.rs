use super::*;
use logging::DebugFlag;

fn matches(args: &[&str]) -> ArgMatches {
    command()
        .try_get_matches_from(std::iter::once("rsync-filter").chain(args.iter().copied()))
        .unwrap()
}

#[test]
fn command_definition_is_consistent() {
    command().debug_assert();
}

#[test]
fn root_is_required() {
    let error = command().try_get_matches_from(["rsync-filter"]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn rule_values_may_start_with_a_dash() {
    let matches = matches(&["-f", "- *.o", "--exclude", "-x", "."]);
    let filters: Vec<_> = matches.get_many::<String>("filter").unwrap().collect();
    let excludes: Vec<_> = matches.get_many::<String>("exclude").unwrap().collect();
    assert_eq!(filters, ["- *.o"]);
    assert_eq!(excludes, ["-x"]);
}

#[test]
fn verbose_count_sets_flag_levels() {
    let config = verbosity(&matches(&["-vv", "."])).unwrap();
    assert_eq!(config.info.get(InfoFlag::Name), 2);
    assert_eq!(config.debug.get(DebugFlag::Filter), 1);
}

#[test]
fn info_and_debug_lists_override_verbosity() {
    let config = verbosity(&matches(&["-v", "--info=name0,skip2", "--debug", "filter2", "."])).unwrap();
    assert_eq!(config.info.get(InfoFlag::Name), 0);
    assert_eq!(config.info.get(InfoFlag::Skip), 2);
    assert_eq!(config.debug.get(DebugFlag::Filter), 2);
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(verbosity(&matches(&["--info=bogus", "."])).is_err());
}

#[test]
fn stats_option_raises_stats_level() {
    let config = verbosity(&matches(&["--stats", "."])).unwrap();
    assert_eq!(config.info.get(InfoFlag::Stats), 2);

    let config = verbosity(&matches(&["--stats", "--info=stats3", "."])).unwrap();
    assert_eq!(config.info.get(InfoFlag::Stats), 3);
}

#[test]
fn filter_errors_map_to_exit_codes() {
    let syntax = FilterScope::from_rules(["bogus-directive x"]).unwrap_err();
    assert_eq!(filter_exit_code(&syntax), EXIT_SYNTAX);

    let mut scope = FilterScope::root(".");
    let resource = scope
        .read_rule("merge /nonexistent/rsync-filter-rules")
        .unwrap_err();
    assert_eq!(filter_exit_code(&resource), EXIT_FILE_IO);
}

#[test]
fn exit_codes_are_clamped() {
    assert_eq!(clamp_status(0), 0);
    assert_eq!(clamp_status(EXIT_PARTIAL), 23);
    assert_eq!(clamp_status(-1), 0);
    assert_eq!(clamp_status(1000), u8::MAX);
}

#[test]
fn help_goes_to_stdout() {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = run(["rsync-filter", "--help"], &mut stdout, &mut stderr);

    assert_eq!(status, 0);
    assert!(String::from_utf8_lossy(&stdout).contains("--exclude"));
    assert!(stderr.is_empty());
}

#[test]
fn unknown_option_is_a_syntax_error() {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = run(["rsync-filter", "--no-such-option", "."], &mut stdout, &mut stderr);

    assert_eq!(status, EXIT_SYNTAX);
    assert!(stdout.is_empty());
    assert!(!stderr.is_empty());
}
