//! ocr-review CLI
//!
//! Terminal front end for reviewing OCR results held by a review server:
//! upload a scan, correct the editable text items, and save.
//!
//! Copyright (c) 2025 Michael A Wright

mod render;

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use clap::{Parser, Subcommand, ValueEnum};
use review_client::{ClientConfig, ReviewHttpClient};
use review_core::view::ImagePanel;
use review_core::{ReviewConfig, ReviewController, ReviewState, UploadFlow};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nhost: ",
    env!("BUILT_HOST"),
    "\ncommit: ",
    env!("BUILT_GIT_COMMIT_HASH"),
    "\nbuilt: ",
    env!("BUILT_TIME_UTC"),
);

const HELP: &str = "\
Commands:
  list                    show the editable text items
  edit <index> <text...>  replace the text of an item
  only-edited on|off      show only items edited in this session
  save                    ask the server to persist the reviewed data
  reload                  upload the document again
  help                    show this help
  quit                    leave";

#[derive(Parser)]
#[command(name = "ocr-review")]
#[command(about = "Review and correct OCR results held by a review server", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FlowArg {
    /// Create the template first, then process images
    TemplateFirst,
    /// Send template JSON and image together
    Combined,
}

impl From<FlowArg> for UploadFlow {
    fn from(flow: FlowArg) -> Self {
        match flow {
            FlowArg::TemplateFirst => UploadFlow::TemplateFirst,
            FlowArg::Combined => UploadFlow::Combined,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a scan and review its editable text interactively
    Review {
        /// Review server base URL
        #[arg(short, long, default_value = "http://127.0.0.1:5000")]
        server: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 120)]
        timeout: u64,

        /// Request shape the server expects
        #[arg(short, long, value_enum, default_value_t = FlowArg::TemplateFirst)]
        flow: FlowArg,

        /// Scanned image to process
        #[arg(short, long)]
        image: PathBuf,

        /// Template JSON
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// The server already holds a template
        #[arg(long)]
        has_template: bool,

        /// Directory to write the original and annotated images to
        #[arg(long)]
        images_dir: Option<PathBuf>,
    },
}

/// One line of interactive input
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    List,
    Edit { index: usize, text: String },
    OnlyEdited(bool),
    Save,
    Reload,
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<ReplCommand, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));
    match word {
        "list" | "ls" => Ok(ReplCommand::List),
        "edit" => {
            let (index, text) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            let index = index
                .parse()
                .map_err(|_| format!("not an item index: '{}'", index))?;
            Ok(ReplCommand::Edit {
                index,
                text: text.to_string(),
            })
        }
        "only-edited" => match rest {
            "on" => Ok(ReplCommand::OnlyEdited(true)),
            "off" => Ok(ReplCommand::OnlyEdited(false)),
            _ => Err("usage: only-edited on|off".to_string()),
        },
        "save" => Ok(ReplCommand::Save),
        "reload" => Ok(ReplCommand::Reload),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

/// Options for an interactive review session
struct ReviewArgs {
    image: PathBuf,
    json: Option<PathBuf>,
    images_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        version = built_info::PKG_VERSION,
        target = built_info::TARGET,
        "starting ocr-review"
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Review {
            server,
            timeout,
            flow,
            image,
            json,
            has_template,
            images_dir,
        } => {
            let client = ReviewHttpClient::new(ClientConfig {
                base_url: server,
                timeout_secs: timeout,
            })
            .context("Failed to build HTTP client")?;
            let config = ReviewConfig {
                flow: flow.into(),
                has_template,
            };
            if let Some(dir) = &images_dir {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            let args = ReviewArgs {
                image,
                json,
                images_dir,
            };
            review(ReviewController::new(client, config), args).await
        }
    }
}

async fn review(
    mut controller: ReviewController<ReviewHttpClient>,
    args: ReviewArgs,
) -> Result<()> {
    if controller.state().flow() == UploadFlow::TemplateFirst {
        if let Some(json) = &args.json {
            let result = controller.create_template(Some(json.clone())).await;
            report(controller.state_mut());
            if let Some(message) = controller.state().template_message() {
                println!("{}", render::message(message));
            }
            if result.is_err() {
                anyhow::bail!("cannot continue without the template");
            }
        }
    }

    load(&mut controller, &args).await?;

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("review> ");
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };
        match command {
            ReplCommand::List => print_list(controller.state()),
            ReplCommand::Edit { index, text } => {
                if controller.save_edit(index, &text).await.is_ok() {
                    println!("Item #{} updated", index);
                    write_images(controller.state(), &args)?;
                } else {
                    controller.state_mut().cancel_edit(index);
                }
                report(controller.state_mut());
            }
            ReplCommand::OnlyEdited(on) => {
                controller.state_mut().set_only_edited(on);
                print_list(controller.state());
            }
            ReplCommand::Save => {
                let _ = controller.save_session().await;
                report(controller.state_mut());
                if let Some(message) = controller.state().save_message() {
                    println!("{}", render::message(message));
                }
            }
            ReplCommand::Reload => load(&mut controller, &args).await?,
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Quit => break,
        }
    }
    Ok(())
}

/// Upload the document and show the outcome
async fn load(
    controller: &mut ReviewController<ReviewHttpClient>,
    args: &ReviewArgs,
) -> Result<()> {
    let json = match controller.state().flow() {
        UploadFlow::Combined => args.json.clone(),
        UploadFlow::TemplateFirst => None,
    };
    let result = controller.load_document(Some(args.image.clone()), json).await;
    report(controller.state_mut());
    let state = controller.state();
    if let Some(message) = state.process_message() {
        println!("{}", render::message(message));
    }
    if result.is_ok() {
        println!("{}", render::image_panel("original", state.original_image()));
        println!("{}", render::image_panel("annotated", state.annotated_image()));
        write_images(state, args)?;
        print_list(state);
    }
    Ok(())
}

fn print_list(state: &ReviewState) {
    println!("{}", render::text_list(&state.text_list()));
}

/// Print and acknowledge any pending notice
fn report(state: &mut ReviewState) {
    if let Some(notice) = state.notice() {
        eprintln!("error: {}", notice);
    }
    state.dismiss_notice();
}

fn write_images(state: &ReviewState, args: &ReviewArgs) -> Result<()> {
    let Some(dir) = &args.images_dir else {
        return Ok(());
    };
    write_jpeg(state.original_image(), &dir.join("original.jpg"))?;
    write_jpeg(state.annotated_image(), &dir.join("annotated.jpg"))
}

fn write_jpeg(panel: &ImagePanel, path: &Path) -> Result<()> {
    let Some(data) = panel.payload() else {
        return Ok(());
    };
    let bytes = general_purpose::STANDARD
        .decode(data)
        .context("Server sent an image that is not valid base64")?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote image");
    Ok(())
}
