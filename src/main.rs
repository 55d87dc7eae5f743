use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use yt_sentiment::{
    extract_video_id, init_tracing_once, run_video_flow, save_run, summary_table, CommentPipeline, PipelineError, Target,
    API_KEY_ENV,
};

#[derive(Parser, Debug)]
#[command(name = "yt-sentiment", about = "YouTube comment scraper and sentiment analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a video or a channel, clean, classify and save the artifacts.
    Analyze(AnalyzeArgs),
    /// Orchestrated single-video run: cached and retried scrape, report, final CSV.
    Flow(FlowArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Video URL or id
    #[arg(long, conflicts_with = "channel", required_unless_present = "channel")]
    video: Option<String>,
    /// Channel id
    #[arg(long)]
    channel: Option<String>,
    /// Videos to process (channel only)
    #[arg(long, default_value_t = 5)]
    videos: usize,
    /// Comments per video
    #[arg(long, default_value_t = 100)]
    comments: usize,
}

#[derive(Args, Debug)]
struct FlowArgs {
    /// Video URL or id
    #[arg(long)]
    video: String,
    #[arg(long, default_value_t = 100)]
    comments: usize,
    /// Raw fetch cache directory (defaults to <data dir>/cache)
    #[arg(long)]
    cache_dir: Option<std::path::PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    // A missing .env is fine; the key may come from the real environment.
    let _ = dotenvy::dotenv();
    init_tracing_once();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let credential_hint = e
                .chain()
                .filter_map(|c| c.downcast_ref::<PipelineError>())
                .any(PipelineError::suggests_credential_check);
            if credential_hint {
                eprintln!("Hint: check that {} is set to a valid YouTube Data API key.", API_KEY_ENV);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let pipeline = CommentPipeline::from_env();
    match cli.command {
        Command::Analyze(args) => analyze(pipeline, args),
        Command::Flow(args) => flow(pipeline, args),
    }
}

fn analyze(pipeline: CommentPipeline, args: AnalyzeArgs) -> Result<()> {
    let target = match (&args.video, &args.channel) {
        (Some(v), _) => Target::video(parse_video(v)?, args.comments),
        (None, Some(c)) => Target::channel(c.trim(), args.videos, args.comments),
        (None, None) => bail!("provide --video or --channel"),
    };
    let pipeline = pipeline.progress(matches!(target, Target::Channel { .. }));

    println!("\n--- 1. SCRAPING ---");
    let run = pipeline.run(&target)?;
    if run.is_empty() {
        println!("No comments left to analyze. Check the video or channel id.");
        return Ok(());
    }

    println!("\n--- 2. CLEANING + 3. SENTIMENT ---");
    let paths = save_run(pipeline.options(), &run)?;

    println!("\nSENTIMENT SUMMARY:");
    print!("{}", summary_table(&run.summary));
    println!("\nDone. Final file: {}", paths.sentiment.display());
    Ok(())
}

fn flow(pipeline: CommentPipeline, args: FlowArgs) -> Result<()> {
    let video_id = parse_video(&args.video)?;
    let cache_dir = args.cache_dir.unwrap_or_else(|| pipeline.options().data_dir.join("cache"));
    let pipeline = pipeline.cache_dir(cache_dir);
    let fetcher = pipeline.fetcher()?;

    match run_video_flow(&pipeline, &fetcher, &video_id, args.comments) {
        Ok(outcome) => {
            println!("\nPipeline complete. File: {}", outcome.output.display());
            println!("Report: {}", outcome.report.display());
            Ok(())
        }
        Err(e) if matches!(e.downcast_ref::<PipelineError>(), Some(PipelineError::NoComments { .. })) => {
            println!("No comments found for video {}.", video_id);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn parse_video(input: &str) -> Result<String> {
    match extract_video_id(input) {
        Some(id) => Ok(id),
        None => bail!("invalid video id or URL: '{}'", input),
    }
}
