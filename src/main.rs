use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;

use topicbook_pdf::{
    BookRequest, DirectorySource, FontFamily, PaperSize, build_book, output_file_name,
};

/// Assemble a paginated PDF book with one chapter per topic.
#[derive(Parser)]
#[command(name = "topicbook-pdf", version, about)]
struct Cli {
    /// Chapter topic, repeatable; order defines chapter numbering
    #[arg(short, long = "topic", value_name = "TOPIC")]
    topics: Vec<String>,

    /// JSON request with topics, bookName, paperSize, fontSize, fontStyle, author
    #[arg(long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Directory holding one <topic-slug>.txt response per topic
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    content_dir: PathBuf,

    /// Book title shown on the cover and in running headers
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// Letter, A4 or A5
    #[arg(long)]
    paper: Option<String>,

    /// Helvetica, Times or Courier
    #[arg(long)]
    font: Option<String>,

    #[arg(long)]
    font_size: Option<u32>,

    /// Output file, or a directory to place a generated file name in
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RequestFile {
    #[serde(default)]
    topics: Vec<String>,
    book_name: Option<String>,
    paper_size: Option<String>,
    font_size: Option<u32>,
    font_style: Option<String>,
    author: Option<String>,
}

fn load_request_file(path: &Path) -> Result<RequestFile, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn build_request(cli: &Cli, file: RequestFile) -> BookRequest {
    let topics = if cli.topics.is_empty() {
        file.topics
    } else {
        cli.topics.clone()
    };
    let mut request = BookRequest::new(topics);
    if let Some(title) = cli.title.clone().or(file.book_name) {
        request.title = title;
    }
    if let Some(author) = cli.author.clone().or(file.author) {
        request.author = author;
    }
    if let Some(paper) = cli.paper.as_deref().or(file.paper_size.as_deref()) {
        request.paper = PaperSize::from_name(paper);
    }
    if let Some(font) = cli.font.as_deref().or(file.font_style.as_deref()) {
        request.font_family = FontFamily::from_name(font);
    }
    if let Some(size) = cli.font_size.or(file.font_size) {
        request.font_size = size;
    }
    request
}

fn output_path(cli: &Cli, request: &BookRequest) -> PathBuf {
    let generated = || output_file_name(&request.title, request.generated_at);
    match &cli.output {
        Some(p) if p.is_dir() => p.join(generated()),
        Some(p) => p.clone(),
        None => PathBuf::from(generated()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let file = match &cli.request {
        Some(path) => match load_request_file(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => RequestFile::default(),
    };
    let request = build_request(&cli, file);
    let output = output_path(&cli, &request);
    let mut source = DirectorySource::new(cli.content_dir.clone());

    match build_book(&request, &mut source, &output) {
        Ok(report) => {
            println!("Wrote {} ({} pages)", output.display(), report.page_count);
            for chapter in &report.chapters {
                println!("  {:>4}  {}", chapter.start_page, chapter.title());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
