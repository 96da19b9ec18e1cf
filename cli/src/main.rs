use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use mos6502_as::{AsmError, Assembler, parse_hex};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mos6502-as",
    version,
    about = "Single-pass MOS 6502 assembler",
    long_about = "Single-pass MOS 6502 assembler.

Each input file is assembled on its own into a flat binary written next to it,
with the extension replaced (default .o). A failing file is reported and the
remaining files are still assembled. Unknown flags are ignored with a warning."
)]
struct Cli {
    /// Load address of the first instruction, 4 hex digits
    #[arg(long, value_name = "HHHH", default_value = "0000", value_parser = parse_origin)]
    origin: u16,

    /// Extension of the output files
    #[arg(short, long, value_name = "EXT", default_value = "o")]
    ext: String,

    /// Also write a listing (.lst) next to each output
    #[arg(short, long)]
    listing: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    /// Assembly source files
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn parse_origin(s: &str) -> Result<u16, String> {
    let digits = s.strip_prefix('$').unwrap_or(s);
    if digits.len() != 4 {
        return Err(format!("'{s}' is not 4 hex digits"));
    }
    parse_hex(digits).ok_or_else(|| format!("'{s}' is not a hex address"))
}

fn output_path(input: &Path, ext: &str) -> PathBuf {
    input.with_extension(ext)
}

/// Split `args` (program name first) into what clap should see and the
/// `-`-prefixed arguments it does not know, which are dropped.
///
/// A known option that takes a value keeps its value, attached or not.
/// Everything after `--` is passed through.
fn split_unknown_flags<I, T>(args: I) -> (Vec<OsString>, Vec<OsString>)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut cmd = Cli::command();
    cmd.build();
    let takes_value = |arg: &clap::Arg| arg.get_action().takes_values();
    let long = |name: &str| cmd.get_arguments().find(|a| a.get_long() == Some(name)).map(takes_value);
    let short = |c: char| cmd.get_arguments().find(|a| a.get_short() == Some(c)).map(takes_value);

    let mut kept = Vec::new();
    let mut ignored = Vec::new();
    let mut args = args.into_iter().map(Into::into);
    kept.extend(args.next());

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            kept.push(arg);
            continue;
        };
        let known = if text == "--" {
            kept.push(arg);
            kept.extend(args.by_ref());
            break;
        } else if let Some(name) = text.strip_prefix("--") {
            match name.split_once('=') {
                Some((name, _)) => long(name).map(|_| false),
                None => long(name),
            }
        } else if let Some(cluster) = text.strip_prefix('-').filter(|c| !c.is_empty()) {
            let mut needs_value = Some(false);
            for (i, c) in cluster.char_indices() {
                match short(c) {
                    // the rest of the cluster is the value
                    Some(true) => {
                        needs_value = Some(i + c.len_utf8() == cluster.len());
                        break;
                    }
                    Some(false) => {}
                    None => {
                        needs_value = None;
                        break;
                    }
                }
            }
            needs_value
        } else {
            Some(false)
        };

        match known {
            Some(needs_value) => {
                kept.push(arg);
                if needs_value {
                    kept.extend(args.next());
                }
            }
            None => ignored.push(arg),
        }
    }
    (kept, ignored)
}

fn main() -> Result<()> {
    let (args, ignored) = split_unknown_flags(std::env::args_os());
    let cli = Cli::parse_from(args);

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    for flag in &ignored {
        warn!("ignoring unknown flag '{}'", flag.to_string_lossy());
    }

    let failed = run(&cli);
    if failed > 0 {
        bail!("{failed} of {} file(s) failed to assemble", cli.files.len());
    }
    Ok(())
}

/// Assemble every file in order. Returns how many failed.
fn run(cli: &Cli) -> usize {
    let assembler = Assembler::with_origin(cli.origin);
    debug!(origin = cli.origin, files = cli.files.len(), "starting");

    let mut failed = 0usize;
    for path in &cli.files {
        if let Err(e) = process_file(&assembler, path, &cli.ext, cli.listing) {
            error!("{}: {:#}", path.display(), e);
            failed += 1;
        }
    }
    failed
}

fn process_file(assembler: &Assembler, path: &Path, ext: &str, listing: bool) -> Result<PathBuf> {
    info!("Assembling {}", path.display());

    let source = fs::read_to_string(path)
        .map_err(AsmError::from)
        .with_context(|| format!("failed to read input file '{}'", path.display()))?;

    let items = assembler.assemble_full(&source)?;
    let bytes: Vec<u8> = items
        .iter()
        .flat_map(|item| item.encoded.as_bytes().iter().copied())
        .collect();

    let out_path = output_path(path, ext);
    if out_path == path {
        bail!("output file would overwrite the input '{}'", path.display());
    }
    let file = File::create(&out_path)
        .map_err(AsmError::from)
        .with_context(|| format!("unable to open output file '{}'", out_path.display()))?;
    let mut writer = BufWriter::new(file);
    Assembler::write_bin(&bytes, &mut writer)?;
    writer.flush()?;

    if listing {
        let lst_path = output_path(path, "lst");
        assembler
            .save_listing(&items, &lst_path)
            .with_context(|| format!("unable to write listing '{}'", lst_path.display()))?;
        debug!("Listing saved to {}", lst_path.display());
    }

    info!("Wrote {} bytes to {}", bytes.len(), out_path.display());
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn origin_parsing() {
        assert_eq!(parse_origin("0800"), Ok(0x0800));
        assert_eq!(parse_origin("$C000"), Ok(0xC000));
        assert!(parse_origin("800").is_err());
        assert!(parse_origin("08G0").is_err());
    }

    #[test]
    fn output_extension_is_replaced() {
        assert_eq!(output_path(Path::new("prog.asm"), "o"), PathBuf::from("prog.o"));
        assert_eq!(output_path(Path::new("dir/a.b.s"), "o"), PathBuf::from("dir/a.b.o"));
        assert_eq!(output_path(Path::new("noext"), "o"), PathBuf::from("noext.o"));
    }

    #[test]
    fn flags_and_files() {
        let cli = Cli::try_parse_from(["mos6502-as", "-l", "--origin", "0800", "a.s", "b.s"]).unwrap();
        assert!(cli.listing);
        assert_eq!(cli.origin, 0x0800);
        assert_eq!(cli.ext, "o");
        assert_eq!(cli.files.len(), 2);
        assert!(Cli::try_parse_from(["mos6502-as"]).is_err());
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mos6502-as-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn assembles_file_to_binary_and_listing() {
        let dir = scratch_dir("ok");
        let src = dir.join("prog.asm");
        fs::write(&src, "LDA #$01\nLDA $0200\nLDA $44,X\n").unwrap();

        let out = process_file(&Assembler::new(), &src, "o", true).unwrap();
        assert_eq!(out, dir.join("prog.o"));
        assert_eq!(fs::read(&out).unwrap(), vec![0xA9, 0x01, 0xAD, 0x00, 0x02, 0xB5, 0x44]);
        assert!(dir.join("prog.lst").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failures_write_nothing() {
        let dir = scratch_dir("bad");
        let src = dir.join("bad.asm");
        fs::write(&src, "NOP\nLDA $G5\n").unwrap();

        let err = process_file(&Assembler::new(), &src, "o", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AsmError>(),
            Some(AsmError::MalformedLiteral { line: 2, .. })
        ));
        assert!(!dir.join("bad.o").exists());

        let missing = process_file(&Assembler::new(), &dir.join("missing.asm"), "o", false);
        assert!(missing.is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    fn parse_lenient(args: &[&str]) -> (Cli, Vec<OsString>) {
        let (kept, ignored) = split_unknown_flags(args.iter().copied());
        (Cli::try_parse_from(kept).unwrap(), ignored)
    }

    #[test]
    fn unknown_flags_are_dropped() {
        let (cli, ignored) = parse_lenient(&["mos6502-as", "-zz", "--bogus", "-lq", "prog.s"]);
        assert_eq!(ignored, vec![OsString::from("-zz"), OsString::from("--bogus"), OsString::from("-lq")]);
        assert_eq!(cli.files, vec![PathBuf::from("prog.s")]);
        assert!(!cli.listing);
    }

    #[test]
    fn known_options_keep_their_values() {
        let (cli, ignored) = parse_lenient(&["mos6502-as", "--origin", "0800", "-ebin", "-lv", "a.s"]);
        assert!(ignored.is_empty());
        assert_eq!(cli.origin, 0x0800);
        assert_eq!(cli.ext, "bin");
        assert!(cli.listing && cli.verbose);

        let (cli, _) = parse_lenient(&["mos6502-as", "--origin=C000", "-e", "bin", "--", "-odd.s"]);
        assert_eq!(cli.origin, 0xC000);
        assert_eq!(cli.ext, "bin");
        assert_eq!(cli.files, vec![PathBuf::from("-odd.s")]);
    }

    #[test]
    fn stray_flag_still_assembles() {
        let dir = scratch_dir("stray");
        let src = dir.join("prog.s");
        fs::write(&src, "LDA #$01\n").unwrap();

        let (cli, ignored) = parse_lenient(&["mos6502-as", "-zz", src.to_str().unwrap()]);
        assert_eq!(ignored.len(), 1);
        assert_eq!(run(&cli), 0);
        assert_eq!(fs::read(dir.join("prog.o")).unwrap(), vec![0xA9, 0x01]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failing_files_do_not_stop_later_ones() {
        let dir = scratch_dir("mixed");
        fs::write(dir.join("bad.s"), "LDA $G5\n").unwrap();
        fs::write(dir.join("good.s"), "LDA #$01\n").unwrap();

        let files = ["missing.s", "bad.s", "good.s"].map(|f| dir.join(f));
        let mut args = vec![OsString::from("mos6502-as")];
        args.extend(files.iter().map(|f| f.clone().into_os_string()));
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(run(&cli), 2);
        assert!(!dir.join("bad.o").exists());
        assert_eq!(fs::read(dir.join("good.o")).unwrap(), vec![0xA9, 0x01]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
