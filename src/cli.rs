// src/cli.rs
use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{eyre, Result, WrapErr};
use url::Url;

use crate::config::consts::{DEFAULT_OUT_DIR, WORKERS};
use crate::config::options::{AppOptions, ExportType};
use crate::core::net;
use crate::file::write_export;
use crate::images::ImageFetcher;
use crate::json::to_json;
use crate::progress::{Progress, ProgressCounts};
use crate::scrape::{collect_class_list, Source};

#[derive(Parser, Debug)]
#[command(
    name = "classlist",
    version,
    about = "Extract student records from a Penn class list report into JSON"
)]
pub struct Args {
    /// Saved report page (.html), `-` for stdin, or the report URL
    pub input: String,

    /// Base URL for relative image links (defaults to the page URL when fetched)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Session cookie sent with page and image requests
    #[arg(long, env = "CLASSLIST_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Skip photo download; records carry no imageBlob
    #[arg(long)]
    pub no_images: bool,

    /// Parallel image downloads
    #[arg(long, default_value_t = WORKERS)]
    pub workers: usize,

    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Output filename (default: derived from the sections on the page)
    #[arg(long, conflicts_with = "per_section")]
    pub filename: Option<String>,

    /// Write one file per section
    #[arg(long)]
    pub per_section: bool,

    /// Replace existing files instead of numbering new ones
    #[arg(long)]
    pub overwrite: bool,

    /// Print the JSON to stdout instead of writing a file
    #[arg(long, conflicts_with_all = ["per_section", "filename"])]
    pub stdout: bool,

    /// No progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Fold flags into options. `source` provides the default image base.
    pub fn to_options(&self, source: &Source) -> Result<AppOptions> {
        let mut opts = AppOptions::default();

        opts.scrape.base_url = match &self.base_url {
            Some(b) => Some(Url::parse(b).wrap_err_with(|| format!("bad --base-url {b:?}"))?),
            None => source.base_url().cloned(),
        };
        opts.scrape.cookie = self.cookie.clone();
        opts.scrape.fetch_images = !self.no_images;
        if self.workers == 0 {
            return Err(eyre!("--workers must be at least 1"));
        }
        opts.scrape.workers = self.workers;

        opts.export.out_dir = self.out_dir.clone();
        opts.export.overwrite = self.overwrite;
        if self.per_section {
            opts.export.export_type = ExportType::PerSection;
        }
        if let Some(name) = &self.filename {
            opts.export.set_file_name(name);
        }
        Ok(opts)
    }
}

/// Progress on stderr, one rewriting status line.
struct StderrProgress {
    counts: ProgressCounts,
    quiet: bool,
}

impl StderrProgress {
    fn redraw(&self) {
        if self.quiet { return; }
        let c = &self.counts;
        let mut err = std::io::stderr().lock();
        let _ = write!(
            err,
            "\r[{:>3}%] entries {}/{}  images {}/{}",
            c.percent(), c.entries, c.total, c.images, c.image_total
        );
        let _ = err.flush();
    }
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.counts.begin(total);
        self.redraw();
    }
    fn status(&mut self, msg: &str) {
        self.counts.status(msg);
        if !self.quiet {
            eprintln!("\n{msg}");
        }
    }
    fn entry_done(&mut self, index: usize) {
        self.counts.entry_done(index);
        self.redraw();
    }
    fn begin_images(&mut self, total: usize) {
        self.counts.begin_images(total);
        self.redraw();
    }
    fn image_done(&mut self, index: usize, ok: bool) {
        self.counts.image_done(index, ok);
        self.redraw();
    }
    fn image_skipped(&mut self, index: usize) {
        self.counts.image_skipped(index);
        self.redraw();
    }
    fn finish(&mut self) {
        self.counts.finish();
        if !self.quiet {
            eprintln!();
            if self.counts.images_failed > 0 {
                eprintln!("{} image(s) could not be fetched", self.counts.images_failed);
            }
            if self.counts.images_skipped > 0 {
                logd!("{} record(s) had no photo link", self.counts.images_skipped);
            }
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::log::init(args.verbose, args.log_file.as_deref())
        .wrap_err("could not open log file")?;

    let source = Source::parse(&args.input)?;
    let opts = args.to_options(&source)?;
    let client = net::build_client(opts.scrape.cookie.as_deref())?;

    logf!("Reading {:?}", source);
    let html_doc = source
        .read(&client)
        .wrap_err_with(|| format!("could not read {}", args.input))?;

    let mut progress = StderrProgress { counts: ProgressCounts::default(), quiet: args.quiet || args.stdout };
    let fetcher: Option<&dyn ImageFetcher> = opts.scrape.fetch_images.then_some(&client as &dyn ImageFetcher);
    let list = collect_class_list(&html_doc, &opts.scrape, fetcher, Some(&mut progress))?;

    if args.stdout {
        println!("{}", to_json(&list.records)?);
        return Ok(());
    }

    let written = write_export(&opts.export, &list)
        .inspect_err(|e| loge!("Export failed: {e}"))
        .wrap_err_with(|| format!("could not write to {}", opts.export.out_dir.display()))?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    if list.rows_failed > 0 {
        logw!("{} row(s) could not be read and were skipped", list.rows_failed);
    }
    Ok(())
}
