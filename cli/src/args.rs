use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about = "Exchange diaries, post comments and upload images", long_about = None)]
pub struct Args {
    /// Backend origin, e.g. <http://127.0.0.1:8080>
    #[arg(long, env = diary_core::config::API_URL_ENV, default_value = diary_core::config::DEFAULT_API_URL)]
    pub api_url: String,

    /// Logging level for all subsystems {off, error, warn, info, debug, trace}
    ///  -- You may also specify `<subsystem>=<level>,<subsystem2>=<level>,...` to set the log level for individual subsystems
    #[arg(long = "loglevel", default_value = "warn")]
    pub log_level: String,

    /// How results are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload an image and print the path it is served under
    Upload {
        /// Image file to upload
        path: PathBuf,
    },

    /// Submit a diary and receive someone else's in exchange
    Exchange {
        #[arg(short, long)]
        author: String,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Comment on a diary
    Comment {
        /// Id of the diary being commented on
        diary_id: i64,

        #[arg(short, long)]
        author: String,

        #[arg(short, long)]
        content: String,
    },

    /// Download an uploaded image
    FetchImage {
        /// Path returned by `upload`, or an absolute URL
        url: String,

        /// Where to write the image
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
pub struct ContentArgs {
    /// Diary text
    #[arg(short, long)]
    pub content: Option<String>,

    /// Read the diary text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}
