use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "fileloc")]
#[command(version)]
#[command(about = "Read files and zip archive entries through one location syntax", long_about = None)]
#[command(after_help = "Examples:\n  \
  fileloc omni.ja -e chrome.manifest            print an entry of omni.ja\n  \
  fileloc omni.ja -e chrome/a.js -r b.js -u     print the URI of a sibling entry\n  \
  fileloc outer.zip -e inner.jar -l             list an archive nested in another")]
pub struct Cli {
    /// Plain file, or the outermost archive when entries are given
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Entry path inside the archive; repeat to descend into nested archives
    #[arg(short = 'e', long = "entry", value_name = "PATH")]
    pub entries: Vec<String>,

    /// Resolve this path relative to the selected location
    #[arg(short = 'r', long = "relative", value_name = "PATH")]
    pub relative: Option<String>,

    /// Print the canonical URI instead of the content
    #[arg(short = 'u', long = "uri")]
    pub uri: bool,

    /// Print the size in bytes instead of the content
    #[arg(short = 's', long = "size")]
    pub size: bool,

    /// List the entries of the selected archive
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Verbose listing with sizes and timestamps
    #[arg(short = 'V', long = "verbose-list", requires = "list")]
    pub verbose_list: bool,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter implied by `-v`, used when RUST_LOG is unset
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
