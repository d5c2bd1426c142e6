#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the front end of the `rsync-filter` binary. It turns rsync's
//! filter-related options into a [`filters::FilterScope`], walks a directory
//! tree, and prints how every entry is classified.
//!
//! # Design
//!
//! - [`run`] parses arguments with clap, installs the verbosity flags through
//!   [`logging::init_tracing`], builds the command-line scope and hands it to
//!   the walker. Output handles are generic so tests drive the CLI with
//!   in-memory buffers.
//! - Rule options are applied in the order they appear on the command line,
//!   recovered from the raw argument vector.
//! - Every directory gets a child scope, which loads its per-directory rule
//!   file when one was declared. The top directory is no exception.
//!
//! # Invariants
//!
//! - Entries are listed depth first in byte order of their names.
//! - Excluded directories are listed but never descended.
//! - The listing goes to stdout, diagnostics go to stderr.
//!
//! # Errors
//!
//! [`run`] returns rsync's exit codes: `1` for bad options or rules, `11` when
//! a rule file cannot be read and `23` when parts of the tree could not be
//! listed. Messages are written to stderr as
//! `rsync-filter error: <message> (code N)`.
//!
//! # Examples
//!
//! ```
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("main.o"), b"").unwrap();
//! std::fs::write(dir.path().join("main.rs"), b"").unwrap();
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//!
//! let status = cli::run(
//!     ["rsync-filter", "--exclude", "*.o", dir.path().to_str().unwrap()],
//!     &mut stdout,
//!     &mut stderr,
//! );
//! assert_eq!(status, 0);
//! assert_eq!(String::from_utf8(stdout).unwrap(), "- ./main.o\n+ ./main.rs\n");
//! ```
//!
//! # See also
//!
//! - [`filters`] for the rule grammar and evaluation.
//! - [`logging`] for the `--info`/`--debug` flags.

mod frontend;

pub use frontend::{EXIT_FILE_IO, EXIT_PARTIAL, EXIT_SYNTAX, PROGRAM_NAME, exit_code_from, run};
