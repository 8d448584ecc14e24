use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use study_notes::{
    gemini::GeminiClient,
    render::pdf::PdfRenderer,
    server::{self, AllowedOrigins, NotesResponse},
    tracing::init_tracing_subscriber,
    yt::transcript::YouTubeTranscripts,
    NotesProcessor, NotesProcessorBuilder, NotesRequest,
};

#[derive(Parser)]
#[command(
    name = "study-notes",
    about = "Study notes and aptitude questions from YouTube transcripts"
)]
struct Cli {
    /// Google Generative Language API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: String,

    /// Gemini model used for both notes and questions
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-pro")]
    model: String,

    /// Gemini API base URL
    #[arg(
        long,
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    gemini_base_url: String,

    /// Preferred caption language
    #[arg(long, env = "TRANSCRIPT_LANGUAGE", default_value = "en")]
    transcript_language: String,

    /// Timeout for every outbound HTTP request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "120")]
    request_timeout_secs: u64,

    /// Directory rendered PDF documents are written to
    #[arg(long, env = "NOTES_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Issue the notes and questions requests concurrently
    #[arg(long, env = "PARALLEL_GENERATION")]
    parallel_generation: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "PORT", default_value = "8000")]
        port: u16,

        /// Comma separated list of allowed CORS origins, `*` for any
        #[arg(long, env = "ALLOWED_ORIGINS", default_value = "http://localhost:8081")]
        allowed_origins: String,

        /// Render a PDF for every successful request
        #[arg(long, env = "RENDER_DOCUMENTS")]
        render_documents: bool,
    },
    /// Run the pipeline once and print the result as JSON
    Generate {
        /// YouTube URL or video id
        #[arg(long)]
        url: String,

        #[arg(long)]
        subject: String,

        /// Also render the PDF document
        #[arg(long)]
        pdf: bool,
    },
}

#[derive(Clone)]
struct Config {
    google_api_key: String,
    model: String,
    gemini_base_url: String,
    transcript_language: String,
    request_timeout: Duration,
    output_dir: PathBuf,
    parallel_generation: bool,
}

fn build_processor(
    config: &Config,
    render_documents: bool,
) -> anyhow::Result<NotesProcessor<YouTubeTranscripts, GeminiClient, PdfRenderer>> {
    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let transcripts = YouTubeTranscripts::new(http_client.clone())
        .with_language(&config.transcript_language);
    let generator = GeminiClient::new(&config.google_api_key)
        .with_client(http_client)
        .with_base_url(&config.gemini_base_url)
        .with_model(&config.model);

    Ok(NotesProcessorBuilder::new()
        .transcripts(transcripts)
        .generator(generator)
        .renderer(PdfRenderer::new(&config.output_dir))
        .render_documents(render_documents)
        .parallel_generation(config.parallel_generation)
        .build())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = Config {
        google_api_key: cli.google_api_key,
        model: cli.model,
        gemini_base_url: cli.gemini_base_url,
        transcript_language: cli.transcript_language,
        request_timeout: Duration::from_secs(cli.request_timeout_secs),
        output_dir: cli.output_dir,
        parallel_generation: cli.parallel_generation,
    };

    match cli.command {
        Command::Serve {
            host,
            port,
            allowed_origins,
            render_documents,
        } => {
            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("Invalid listen address {host}:{port}"))?;
            let origins = AllowedOrigins::parse(&allowed_origins);
            tracing::info!(
                model = %config.model,
                ?origins,
                render_documents,
                parallel_generation = config.parallel_generation,
                "Configured notes service"
            );

            let processor = Arc::new(build_processor(&config, render_documents)?);
            server::serve(addr, server::router(processor, &origins)).await?;
        }
        Command::Generate { url, subject, pdf } => {
            let processor = build_processor(&config, pdf)?;
            let request = NotesRequest {
                youtube_url: url,
                subject,
            };

            let notes = processor.process(&request).await?;
            let response = NotesResponse::from(notes);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
