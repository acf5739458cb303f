use anyhow::{Context, Result};
use markdown_polish_config::{IgnoreSet, Settings};
use markdown_polish_engine::{
    FormatService, NoteMetadata, PassSettings, PassthroughFormatter, io,
};
use relative_path::RelativePathBuf;
use std::{
    env,
    path::PathBuf,
    process,
    time::{Duration, Instant},
};

/// Frontmatter key that force-enables or force-disables formatting for one
/// document, overriding the ignore patterns.
const FRONTMATTER_KEY_ENABLED: &str = "polish";
/// Frontmatter key that opts a document into the fast path without cursor
/// tracking.
const FRONTMATTER_KEY_FAST_MODE: &str = "polish-fast-mode";

/// Files slower than this get a warning; nothing is aborted.
const SLOW_FORMAT_WARNING: Duration = Duration::from_secs(1);

struct Args {
    notes_root: PathBuf,
    check_only: bool,
    remove_extra_spaces: bool,
    add_trailing_spaces: bool,
}

fn print_usage() {
    eprintln!("Usage: markdown-polish [OPTIONS] [NOTES_ROOT]");
    eprintln!();
    eprintln!("Reformat Markdown/MDX files under NOTES_ROOT (default: current directory).");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --check                 Report files that would change without writing");
    eprintln!("  --remove-extra-spaces   Enable the excess-space cleanup pass");
    eprintln!("  --add-trailing-spaces   Enable the empty-item trailing-space pass");
    eprintln!("  -h, --help              Show this message");
}

fn parse_args() -> Args {
    let mut args = Args {
        notes_root: PathBuf::from("."),
        check_only: false,
        remove_extra_spaces: false,
        add_trailing_spaces: false,
    };

    let mut roots = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--check" => args.check_only = true,
            "--remove-extra-spaces" => args.remove_extra_spaces = true,
            "--add-trailing-spaces" => args.add_trailing_spaces = true,
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            _ if arg.starts_with('-') => {
                eprintln!("Unknown option: {arg}");
                print_usage();
                process::exit(2);
            }
            _ => roots.push(PathBuf::from(arg)),
        }
    }

    match roots.len() {
        0 => {}
        1 => args.notes_root = roots.remove(0),
        _ => {
            eprintln!("Expected at most one NOTES_ROOT");
            print_usage();
            process::exit(2);
        }
    }

    args
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args();

    let settings = Settings::load()
        .context("failed to load settings")?
        .unwrap_or_default();
    let ignore = settings.ignore_set().context("invalid ignore patterns")?;

    let service = FormatService::new(PassthroughFormatter, PassSettings {
        remove_extra_spaces: settings.remove_extra_spaces || args.remove_extra_spaces,
        add_trailing_spaces: settings.add_trailing_spaces || args.add_trailing_spaces,
        format_embedded_code: settings.format_embedded_code,
        extra_options: settings.format_options.clone(),
    });

    let files = io::scan_markdown_files(&args.notes_root)
        .with_context(|| format!("failed to scan {}", args.notes_root.display()))?;

    let mut changed = 0usize;
    for file in &files {
        let relative = file.strip_prefix(&args.notes_root).unwrap_or(file);
        let relative = RelativePathBuf::from_path(relative)
            .with_context(|| format!("non-relative path {}", file.display()))?;

        if process_file(&service, &ignore, &args, &relative)
            .with_context(|| format!("failed to format {relative}"))?
        {
            changed += 1;
        }
    }

    log::info!(
        "{changed} of {} files {}",
        files.len(),
        if args.check_only {
            "would change"
        } else {
            "reformatted"
        }
    );

    if args.check_only && changed > 0 {
        process::exit(1);
    }

    Ok(())
}

fn process_file(
    service: &FormatService<PassthroughFormatter>,
    ignore: &IgnoreSet,
    args: &Args,
    relative: &RelativePathBuf,
) -> Result<bool> {
    let content = io::read_file(relative, &args.notes_root)?;
    let metadata = note_metadata(relative.clone(), &content);

    if !service.should_format(&metadata, ignore.is_ignored(relative)) {
        log::debug!("{relative}: skipped");
        return Ok(false);
    }

    let started = Instant::now();
    let result = service.format_text(&content, &metadata)?;
    let elapsed = started.elapsed();
    if elapsed > SLOW_FORMAT_WARNING {
        log::warn!("{relative}: formatting took {elapsed:.1?}");
    }

    let Some(formatted) = result else {
        return Ok(false);
    };

    if args.check_only {
        println!("would reformat {relative}");
    } else {
        io::write_file(relative, &args.notes_root, &formatted)?;
        println!("reformatted {relative}");
    }

    Ok(true)
}

fn note_metadata(path: RelativePathBuf, content: &str) -> NoteMetadata {
    let mut metadata = NoteMetadata::new(path);
    metadata.use_formatter = frontmatter_flag(content, FRONTMATTER_KEY_ENABLED);
    metadata.fast_mode = frontmatter_flag(content, FRONTMATTER_KEY_FAST_MODE).unwrap_or(false);
    metadata
}

/// Pull a boolean flag out of a leading `---` frontmatter block. Anything
/// that is not a literal `true`/`false` counts as absent.
fn frontmatter_flag(content: &str, key: &str) -> Option<bool> {
    let block = content.strip_prefix("---\n")?;
    let end = block.find("\n---")?;

    for line in block[..end].lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim() == key {
            return match value.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            };
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontmatter_flag_reads_booleans() {
        let content = "---\npolish: true\npolish-fast-mode: false\n---\n# Title\n";

        assert_eq!(frontmatter_flag(content, "polish"), Some(true));
        assert_eq!(frontmatter_flag(content, "polish-fast-mode"), Some(false));
        assert_eq!(frontmatter_flag(content, "missing"), None);
    }

    #[test]
    fn frontmatter_flag_requires_leading_block() {
        assert_eq!(frontmatter_flag("# Title\npolish: true\n", "polish"), None);
        assert_eq!(frontmatter_flag("---\npolish: true\n", "polish"), None);
    }

    #[test]
    fn frontmatter_flag_ignores_non_boolean_values() {
        let content = "---\npolish: maybe\n---\n";

        assert_eq!(frontmatter_flag(content, "polish"), None);
    }

    #[test]
    fn note_metadata_combines_path_and_flags() {
        let content = "---\npolish: false\npolish-fast-mode: true\n---\n- item\n";
        let metadata = note_metadata(RelativePathBuf::from("notes/a.mdx"), content);

        assert_eq!(metadata.extension, "mdx");
        assert_eq!(metadata.use_formatter, Some(false));
        assert!(metadata.fast_mode);
    }
}
