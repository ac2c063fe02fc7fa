use anyhow::Result;
use relative_path::RelativePathBuf;
use std::{env, path::PathBuf, process};
use trailmark_config::Config;
use trailmark_engine::{Buffer, Span, WhitespaceMarker, io};

struct Finding {
    line: usize,
    column: usize,
    width: usize,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut fix = false;
    let mut root_arg = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "--fix" => fix = true,
            flag if flag.starts_with('-') => {
                eprintln!("Unknown flag: {flag}");
                eprintln!("Usage: {} [--fix] [path]", args[0]);
                process::exit(1);
            }
            path => {
                if root_arg.replace(PathBuf::from(path)).is_some() {
                    eprintln!("Usage: {} [--fix] [path]", args[0]);
                    process::exit(1);
                }
            }
        }
    }
    let target = root_arg.unwrap_or_else(|| PathBuf::from("."));

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file at {}: {e}", config_path.display());
            process::exit(1);
        }
    };

    // A single file is checked as its own scan root
    let (root, files) = if target.is_file() {
        let file_name = match target.file_name() {
            Some(name) => RelativePathBuf::from(name.to_string_lossy().as_ref()),
            None => {
                eprintln!("Error: {} is not a scannable file", target.display());
                process::exit(1);
            }
        };
        let root = target.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
        (root, vec![file_name])
    } else {
        if let Err(e) = io::validate_root(&target) {
            eprintln!("Error: Scan path '{}' is invalid: {e}", target.display());
            process::exit(1);
        }
        let files = io::scan_source_files(&target, &config.extensions)?
            .into_iter()
            .filter(|file| !config.is_ignored(file.as_str()))
            .collect();
        (target, files)
    };

    let mut total_findings = 0usize;
    for file in &files {
        let content = match io::read_file(file, &root) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Warning: skipping {file}: {e}");
                continue;
            }
        };

        let mut buffer = Buffer::from_text(&content);
        let mut marker = WhitespaceMarker::new(&buffer);

        if fix {
            let stripped = strip_marks(&mut buffer, &mut marker)?;
            if stripped > 0 {
                io::write_file(file, &root, &buffer.text())?;
                println!("{file}: stripped {stripped} trailing-whitespace range(s)");
            }
        } else {
            for finding in findings(&buffer, &marker) {
                total_findings += 1;
                println!(
                    "{file}:{}:{}: trailing whitespace ({} byte(s))",
                    finding.line, finding.column, finding.width
                );
            }
        }
    }

    if total_findings > 0 {
        eprintln!("{total_findings} finding(s)");
        process::exit(1);
    }

    Ok(())
}

/// Marked spans as 1-based line/column findings, sorted by position.
fn findings(buffer: &Buffer, marker: &WhitespaceMarker) -> Vec<Finding> {
    let mut spans: Vec<Span> = marker.spans().collect();
    spans.sort();
    spans
        .into_iter()
        .map(|span| {
            let line = buffer.line_of_offset(span.start);
            let line_start = buffer.line_span(line).start;
            Finding {
                line: line + 1,
                column: span.start - line_start + 1,
                width: span.len(),
            }
        })
        .collect()
}

/// Delete marked spans one edit at a time until the cache drains, keeping
/// the marker synchronized through each patch.
fn strip_marks(buffer: &mut Buffer, marker: &mut WhitespaceMarker) -> Result<usize> {
    let mut stripped = 0;
    while let Some(span) = marker.spans().min() {
        let patch = buffer.edit(span.into(), "");
        marker.sync(buffer, &patch)?;
        stripped += 1;
    }
    Ok(stripped)
}
