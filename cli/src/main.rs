// Entrypoint: build exactly one API client from the configured origin,
// then run a single command against it.

mod args;
mod render;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use diary_core::{ClientConfig, DiaryApi, ImageFile, Transport, UreqTransport};
use log::info;

use crate::args::{Args, Command};
use crate::render::Renderer;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new().parse_filters(&args.log_level).init();

    let (api, renderer) = bootstrap(&args)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&api, renderer, args.command, &mut out).await?;
    out.flush()?;
    Ok(())
}

/// One client and one renderer per process. An unusable origin stops
/// startup here instead of failing on every request.
fn bootstrap(args: &Args) -> Result<(DiaryApi<UreqTransport>, Renderer)> {
    let config = ClientConfig::new(&args.api_url).context("invalid backend origin")?;
    info!("using backend {}", config.base_url());
    Ok((DiaryApi::connect(&config), Renderer::new(args.format)))
}

async fn run<T: Transport>(api: &DiaryApi<T>, renderer: Renderer, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Upload { path } => {
            let file = ImageFile::open(&path)?;
            let uploaded = api
                .upload_image(&file)
                .await
                .with_context(|| format!("uploading {}", path.display()))?;
            renderer.uploaded(out, &uploaded)
        }
        Command::Exchange { author, content } => {
            let text = match (content.content, content.file) {
                (Some(text), _) => text,
                (None, Some(file)) => {
                    std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?
                }
                (None, None) => anyhow::bail!("either --content or --file is required"),
            };
            let diary = api.exchange_diary(&author, &text).await.context("exchanging diary")?;
            renderer.diary(out, &diary)
        }
        Command::Comment {
            diary_id,
            author,
            content,
        } => {
            let comment = api
                .post_comment(diary_id, &author, &content)
                .await
                .with_context(|| format!("commenting on diary {diary_id}"))?;
            renderer.comment(out, &comment)
        }
        Command::FetchImage { url, output } => {
            let bytes = api.fetch_image(&url).await.with_context(|| format!("fetching {url}"))?;
            std::fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;
            renderer.saved(out, &output, bytes.len())
        }
    }
}
