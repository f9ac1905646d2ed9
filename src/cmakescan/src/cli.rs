// cmakescan/src/cli.rs

//! Command-line driver: read a CMakeLists.txt, print its module's public
//! headers, one per line.

use crate::query::CMakeScanner;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const CMAKELISTS: &str = "CMakeLists.txt";

#[derive(Parser, Debug)]
#[command(name = "cmakescan")]
#[command(about = "List the public headers a CMakeLists.txt declares for a module", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Name of the module the CMakeLists.txt defines
    pub module: String,

    /// Path of the CMakeLists.txt, relative to its git module's root
    pub cmakelists: PathBuf,

    /// Read the CMake source from FILE instead of standard input
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Emit a JSON report instead of a plain list
    #[cfg(feature = "json")]
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Directory to prepend to each header, checking the path names a
    /// CMakeLists.txt.
    pub fn root(&self) -> Result<&Path> {
        if self.cmakelists.file_name().and_then(|n| n.to_str()) != Some(CMAKELISTS) {
            bail!(
                "Pass name of module and path of {} on command line, not {}",
                CMAKELISTS,
                self.cmakelists.display()
            );
        }
        Ok(self.cmakelists.parent().unwrap_or_else(|| Path::new("")))
    }
}

#[cfg(feature = "json")]
#[derive(serde::Serialize)]
struct Report<'a> {
    module: &'a str,
    root: String,
    headers: Vec<&'a str>,
}

/// Scan the input named by `cli` (or `stdin`) and write headers to `out`.
pub fn run<R: Read, W: Write>(cli: &Cli, stdin: R, mut out: W) -> Result<()> {
    let root = cli.root()?;
    let text = read_source(cli.input.as_deref(), stdin)?;

    let mut scanner = CMakeScanner::new(cli.module.as_str(), root);
    let headers = scanner
        .ingest_str(&text)
        .and_then(|()| scanner.headers())
        .map_err(|err| {
            warn!("{} error in {}", err.category(), cli.cmakelists.display());
            err
        })
        .with_context(|| format!("Failed to scan {}", cli.cmakelists.display()))?;
    info!("{} public headers in {}", headers.len(), cli.module);

    #[cfg(feature = "json")]
    if cli.json {
        let report = Report {
            module: scanner.module(),
            root: root.to_string_lossy().into_owned(),
            headers: headers.iter().map(|h| h.trim_end_matches('\n')).collect(),
        };
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    out.write_all(headers.concat().as_bytes())?;
    out.flush()?;
    Ok(())
}

fn read_source<R: Read>(input: Option<&Path>, mut stdin: R) -> Result<String> {
    match input {
        Some(path) => Ok(fs_err::read_to_string(path)?),
        None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("Failed to read standard input")?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("cmakescan").chain(args.iter().copied()))
    }

    fn run_to_string(cli: &Cli, stdin: &str) -> Result<String> {
        let mut out = Vec::new();
        run(cli, stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_reads_stdin() -> Result<()> {
        let cli = cli(&["Core", "src/corelib/CMakeLists.txt"]);
        let out = run_to_string(&cli, "qt_internal_add_module(Core SOURCES foo.h bar_p.h)\n")?;
        assert_eq!(out, "src/corelib/foo.h\n");
        Ok(())
    }

    #[test]
    fn test_reads_input_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "set(HDRS a.h b.h)")?;
        writeln!(file, "qt_internal_extend_target(Gui SOURCES ${{HDRS}})")?;

        let path = file.path().to_string_lossy().into_owned();
        let cli = cli(&["Gui", "src/gui/CMakeLists.txt", "--input", &path]);
        let out = run_to_string(&cli, "ignored(")?;
        assert_eq!(out, "src/gui/a.h\nsrc/gui/b.h\n");
        Ok(())
    }

    #[test]
    fn test_rejects_other_file_names() {
        let cli = cli(&["Core", "src/corelib/CMakeLists.cmake"]);
        let err = run_to_string(&cli, "").unwrap_err();
        assert!(err.to_string().starts_with("Pass name of module"));
    }

    #[test]
    fn test_bare_cmakelists_has_empty_root() -> Result<()> {
        let cli = cli(&["Core", "CMakeLists.txt"]);
        let out = run_to_string(&cli, "qt_internal_add_module(Core SOURCES x.h)")?;
        assert_eq!(out, "x.h\n");
        Ok(())
    }

    #[test]
    fn test_scan_error_is_reported() {
        let cli = cli(&["Core", "CMakeLists.txt"]);
        let err = run_to_string(&cli, "if(FOO)\nqt_internal_add_module(Core SOURCES foo.h)\n")
            .unwrap_err();
        let root = err.root_cause().to_string();
        assert!(root.starts_with("Unterminated conditional"), "{}", root);
        let scan_err = err.downcast_ref::<ParseError>().unwrap();
        assert_eq!(scan_err.category(), "control");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_report() -> Result<()> {
        let cli = cli(&["Core", "src/CMakeLists.txt", "--json"]);
        let out = run_to_string(&cli, "qt_internal_add_module(Core SOURCES a.h)")?;
        let value: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(value["module"], "Core");
        assert_eq!(value["root"], "src");
        assert_eq!(value["headers"][0], "a.h");
        Ok(())
    }
}
