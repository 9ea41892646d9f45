//! CLI argument parsing for imgtopdf.
//!
//! This module defines the command-line interface using `clap`. Unknown
//! options are not fatal: a pre-scan removes them with a warning before clap
//! sees the arguments.
//!
//! # Examples
//!
//! ```no_run
//! use imgtopdf::cli::parse_args;
//!
//! let parsed = parse_args(std::env::args()).unwrap();
//! for flag in &parsed.ignored {
//!     eprintln!("warning: ignoring unknown option '{flag}'");
//! }
//! let config = parsed.cli.to_config().unwrap();
//! ```

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::collections::HashSet;
use std::str::FromStr;

use crate::config::{
    Config, CustomSize, DEFAULT_RESOLUTION_DPI, Orientation, PageSpecDefaults, RecursionDepth,
};
use crate::error::{ImgToPdfError, Result};
use crate::paper::PaperSize;

/// Convert images into a single PDF or PostScript document.
///
/// Every image becomes one page. The last argument names the output document
/// and must end in .pdf or .ps.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgtopdf")]
#[command(version)]
#[command(about = "Convert images into a single PDF or PostScript document", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Images, directories or glob patterns, then the output document
    ///
    /// Examples:
    ///   imgtopdf scan1.png scan2.png out.pdf
    ///   imgtopdf 'photos/*.jpg' album.ps
    #[arg(value_name = "INPUT")]
    pub args: Vec<String>,

    /// Print usage and exit
    #[arg(short = 'h', long = "help", short_alias = '?')]
    pub help: bool,

    /// Print a line for every page written
    #[arg(short, long)]
    pub verbose: bool,

    /// List the readable image formats and exit
    #[arg(long)]
    pub list_image_formats: bool,

    /// List the supported page sizes and exit
    #[arg(long)]
    pub list_page_sizes: bool,

    /// Decode one image at a time
    #[arg(short, long, conflicts_with = "jobs")]
    pub singlethreaded: bool,

    /// Number of images decoded in parallel
    ///
    /// Default is the number of CPU cores.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Paper size, e.g. A4, Letter or Custom
    #[arg(long, value_name = "NAME", default_value = "A4")]
    pub page_size: String,

    /// Page orientation
    #[arg(long, value_name = "ORIENTATION", default_value = "landscape")]
    #[arg(value_parser = ["portrait", "landscape"])]
    pub orientation: String,

    /// Pixels per inch used to size images on the page
    #[arg(long, value_name = "DPI", default_value_t = DEFAULT_RESOLUTION_DPI)]
    pub resolution: u32,

    /// Paper dimensions in millimetres for --page-size Custom, e.g. 100x150
    #[arg(long, value_name = "WxH")]
    pub custom_size: Option<String>,

    /// How deep directories are searched for images (a number or 'unlimited')
    #[arg(long, value_name = "N", default_value = "1")]
    pub depth: String,
}

/// Outcome of parsing a command line.
#[derive(Debug, Clone)]
pub struct ParsedCli {
    /// Parsed arguments.
    pub cli: Cli,
    /// Unknown options that were dropped, in order of appearance.
    pub ignored: Vec<String>,
}

/// Option names the parser understands.
struct KnownFlags {
    longs: HashSet<String>,
    shorts: HashSet<char>,
    long_values: HashSet<String>,
    short_values: HashSet<char>,
}

impl KnownFlags {
    fn from_command() -> Self {
        let command = Cli::command();
        let mut known = Self {
            longs: HashSet::from(["version".to_string()]),
            shorts: HashSet::from(['V']),
            long_values: HashSet::new(),
            short_values: HashSet::new(),
        };

        for arg in command.get_arguments() {
            let takes_value = arg.get_action().takes_values();

            for long in arg.get_long_and_visible_aliases().into_iter().flatten() {
                known.longs.insert(long.to_string());
                if takes_value {
                    known.long_values.insert(long.to_string());
                }
            }
            for short in arg.get_short_and_visible_aliases().into_iter().flatten() {
                known.shorts.insert(short);
                if takes_value {
                    known.short_values.insert(short);
                }
            }
            if let Some(aliases) = arg.get_all_short_aliases() {
                known.shorts.extend(aliases);
            }
        }

        known
    }

    /// Whether a `--long[=value]` token is known, and whether it needs the
    /// next token as its value.
    fn long(&self, token: &str) -> Option<bool> {
        let (name, inline) = match token.split_once('=') {
            Some((name, _)) => (name, true),
            None => (token, false),
        };
        self.longs
            .contains(name)
            .then(|| !inline && self.long_values.contains(name))
    }

    /// Same as [`long`](Self::long) for a cluster of short flags.
    fn short_cluster(&self, cluster: &str) -> Option<bool> {
        for (i, c) in cluster.char_indices() {
            if !self.shorts.contains(&c) {
                return None;
            }
            if self.short_values.contains(&c) {
                let rest = &cluster[i + c.len_utf8()..];
                return Some(rest.is_empty());
            }
        }
        Some(false)
    }
}

/// Drop options clap does not know, returning the kept and dropped tokens.
///
/// The first token is the program name. Scanning stops at `--`.
fn prescan(tokens: Vec<String>) -> (Vec<String>, Vec<String>) {
    let known = KnownFlags::from_command();
    let mut kept = Vec::with_capacity(tokens.len());
    let mut ignored = Vec::new();

    let mut iter = tokens.into_iter();
    kept.extend(iter.next());

    while let Some(token) = iter.next() {
        let verdict = if token == "--" {
            kept.push(token);
            kept.extend(iter.by_ref());
            break;
        } else if let Some(long) = token.strip_prefix("--") {
            known.long(long)
        } else if token.len() > 1 && token.starts_with('-') {
            known.short_cluster(&token[1..])
        } else {
            kept.push(token);
            continue;
        };

        match verdict {
            Some(needs_value) => {
                kept.push(token);
                if needs_value {
                    kept.extend(iter.next());
                }
            }
            None => ignored.push(token),
        }
    }

    (kept, ignored)
}

/// Parse a full command line, program name first.
///
/// # Errors
///
/// - [`ImgToPdfError::Usage`] when no arguments are given or help is requested
/// - [`ImgToPdfError::InvalidArguments`] when clap rejects the arguments
///
/// `--version` prints the version and exits the process.
pub fn parse_args<I, T>(args: I) -> Result<ParsedCli>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
    if tokens.len() <= 1 {
        return Err(ImgToPdfError::Usage);
    }

    let (kept, ignored) = prescan(tokens);

    let cli = match Cli::try_parse_from(kept) {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::DisplayVersion => err.exit(),
        Err(err) => {
            return Err(ImgToPdfError::invalid_arguments(
                err.render().to_string().trim_end(),
            ));
        }
    };

    if cli.help {
        return Err(ImgToPdfError::Usage);
    }

    Ok(ParsedCli { cli, ignored })
}

impl Cli {
    /// Whether the invocation only asks for a listing.
    pub fn is_listing(&self) -> bool {
        self.list_image_formats || self.list_page_sizes
    }

    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`ImgToPdfError::InvalidConfig`] if:
    /// - The page size, orientation, custom size or depth cannot be parsed
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let paper_size = PaperSize::from_str(&self.page_size)?;
        let orientation = Orientation::from_str(&self.orientation)?;
        let recursion = RecursionDepth::from_str(&self.depth)?;

        let custom_size = match self.custom_size {
            Some(ref size) => Some(
                CustomSize::parse(size).map_err(|e| ImgToPdfError::invalid_config(e.to_string()))?,
            ),
            None => None,
        };

        let jobs = if self.singlethreaded {
            Some(1)
        } else {
            self.jobs
        };

        let config = Config {
            verbose: self.verbose,
            jobs,
            recursion,
            page: PageSpecDefaults {
                paper_size,
                orientation,
                resolution_dpi: self.resolution,
                custom_size,
            },
        };

        config.validate().map_err(|e| {
            ImgToPdfError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}
