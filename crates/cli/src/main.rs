//! ctljournal-dump - print the contents of a ctljournal file.
//!
//! ```text
//! ctljournal-dump control.journal
//! ctljournal-dump control.journal --json --limit 20 | jq .
//! ```
//!
//! Exits 0 when the journal ends cleanly, 1 when decoding stopped on a
//! trailing error (corruption, truncation, unknown type), 2 on usage or
//! I/O problems opening the file.

mod format;

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ctljournal_core::{ReadItem, TypeRegistry};
use ctljournal_durability::{ChannelReader, FrameReader, JournalOptions};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use format::{format_item, OutputMode};

fn build_cli() -> Command {
    Command::new("ctljournal-dump")
        .about("Print the records of a ctljournal file")
        .arg(
            Arg::new("path")
                .help("Journal file to read")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("One JSON document per record")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .short('n')
                .help("Stop after N records")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("limits")
                .long("limits")
                .help("Length limit preset applied while decoding")
                .value_parser(["default", "strict", "permissive"])
                .default_value("default"),
        )
        .arg(
            Arg::new("background")
                .long("background")
                .help("Decode on a background thread")
                .action(ArgAction::SetTrue),
        )
}

/// Parsed command line.
#[derive(Debug)]
struct DumpArgs {
    path: PathBuf,
    mode: OutputMode,
    limit: Option<usize>,
    options: JournalOptions,
    background: bool,
}

impl DumpArgs {
    fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let path = matches
            .get_one::<PathBuf>("path")
            .cloned()
            .context("missing journal path")?;
        let mode = if matches.get_flag("json") {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let options = match matches.get_one::<String>("limits").map(String::as_str) {
            Some("strict") => JournalOptions::strict(),
            Some("permissive") => JournalOptions::permissive(),
            _ => JournalOptions::default(),
        };
        Ok(DumpArgs {
            path,
            mode,
            limit: matches.get_one::<usize>("limit").copied(),
            options,
            background: matches.get_flag("background"),
        })
    }
}

/// What a dump saw.
#[derive(Debug, Default, PartialEq, Eq)]
struct DumpSummary {
    records: usize,
    failed: bool,
}

/// Print up to `limit` items from `items` to `out`.
fn dump<I, W>(
    items: I,
    registry: &TypeRegistry,
    mode: OutputMode,
    limit: Option<usize>,
    out: &mut W,
) -> io::Result<DumpSummary>
where
    I: Iterator<Item = ReadItem>,
    W: Write,
{
    let mut summary = DumpSummary::default();
    for (index, item) in items.take(limit.unwrap_or(usize::MAX)).enumerate() {
        writeln!(out, "{}", format_item(index, &item, registry, mode))?;
        if item.is_error() {
            summary.failed = true;
        } else {
            summary.records += 1;
        }
    }
    out.flush()?;
    Ok(summary)
}

fn open_items(
    args: &DumpArgs,
    registry: Arc<TypeRegistry>,
) -> anyhow::Result<Box<dyn Iterator<Item = ReadItem>>> {
    let file = File::open(&args.path)
        .with_context(|| format!("Failed to open journal {}", args.path.display()))?;
    let source: Box<dyn Read + Send> = Box::new(BufReader::new(file));
    let reader = FrameReader::new(source, registry).with_options(args.options);
    if args.background {
        let channel = ChannelReader::spawn(reader).context("Failed to start decode thread")?;
        Ok(Box::new(channel))
    } else {
        Ok(Box::new(reader))
    }
}

fn run(args: &DumpArgs) -> anyhow::Result<DumpSummary> {
    let registry = Arc::new(TypeRegistry::control_plane());
    let items = open_items(args, registry.clone())?;
    debug!("Dumping {} with {:?}", args.path.display(), args.options);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = dump(items, &registry, args.mode, args.limit, &mut out)?;
    info!(
        "Read {} records from {}{}",
        summary.records,
        args.path.display(),
        if summary.failed { " (stopped on error)" } else { "" }
    );
    Ok(summary)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = build_cli().get_matches();
    let args = match DumpArgs::from_matches(&matches) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("(error) {:#}", e);
            process::exit(2);
        }
    };

    match run(&args) {
        Ok(summary) if summary.failed => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("(error) {:#}", e);
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctljournal_core::objects::Zone;
    use ctljournal_core::{JournalWriter, ObjectType};
    use ctljournal_durability::MemoryJournal;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> DumpArgs {
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        DumpArgs::from_matches(&matches).unwrap()
    }

    fn journal_bytes() -> Vec<u8> {
        let mut journal = MemoryJournal::new(Arc::new(TypeRegistry::control_plane()));
        journal.version("1.0.0").unwrap();
        journal
            .create(
                ObjectType::ZONE,
                &Zone {
                    zone_key: "z1".into(),
                    name: "default".into(),
                },
            )
            .unwrap();
        journal.delete(ObjectType::ZONE, "z1").unwrap();
        journal.into_bytes()
    }

    #[test]
    fn test_args_defaults() {
        let args = parse(&["ctljournal-dump", "a.journal"]);
        assert_eq!(args.path, PathBuf::from("a.journal"));
        assert_eq!(args.mode, OutputMode::Human);
        assert_eq!(args.limit, None);
        assert_eq!(args.options, JournalOptions::default());
        assert!(!args.background);
    }

    #[test]
    fn test_args_flags() {
        let args = parse(&[
            "ctljournal-dump",
            "a.journal",
            "--json",
            "--limit",
            "5",
            "--limits",
            "strict",
            "--background",
        ]);
        assert_eq!(args.mode, OutputMode::Json);
        assert_eq!(args.limit, Some(5));
        assert_eq!(args.options, JournalOptions::strict());
        assert!(args.background);
    }

    #[test]
    fn test_args_reject_bad_limit() {
        assert!(build_cli()
            .try_get_matches_from(["ctljournal-dump", "a.journal", "--limit", "many"])
            .is_err());
        assert!(build_cli()
            .try_get_matches_from(["ctljournal-dump"])
            .is_err());
    }

    #[test]
    fn test_dump_clean_journal() {
        let registry = TypeRegistry::control_plane();
        let reader = FrameReader::new(
            io::Cursor::new(journal_bytes()),
            Arc::new(TypeRegistry::control_plane()),
        );
        let mut out = Vec::new();
        let summary = dump(reader, &registry, OutputMode::Human, None, &mut out).unwrap();
        assert_eq!(summary, DumpSummary { records: 3, failed: false });

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().contains("Zone(1)"));
    }

    #[test]
    fn test_dump_respects_limit() {
        let registry = TypeRegistry::control_plane();
        let reader = FrameReader::new(
            io::Cursor::new(journal_bytes()),
            Arc::new(TypeRegistry::control_plane()),
        );
        let mut out = Vec::new();
        let summary = dump(reader, &registry, OutputMode::Json, Some(1), &mut out).unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_dump_truncated_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("torn.journal");
        let mut bytes = journal_bytes();
        bytes.truncate(bytes.len() - 3);
        std::fs::write(&path, bytes).unwrap();

        let path_arg = path.to_str().unwrap();
        for argv in [
            vec!["ctljournal-dump", path_arg],
            vec!["ctljournal-dump", path_arg, "--background"],
        ] {
            let args = parse(&argv);
            let registry = Arc::new(TypeRegistry::control_plane());
            let items = open_items(&args, registry.clone()).unwrap();
            let mut out = Vec::new();
            let summary = dump(items, &registry, args.mode, None, &mut out).unwrap();
            assert_eq!(summary, DumpSummary { records: 2, failed: true });
            assert!(String::from_utf8(out).unwrap().contains("(error)"));
        }
    }

    #[test]
    fn test_open_missing_file() {
        let args = parse(&["ctljournal-dump", "/nonexistent/ctljournal/none.journal"]);
        let err = open_items(&args, Arc::new(TypeRegistry::control_plane()))
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("Failed to open journal"));
    }
}
