//! CLI for dalle-studio - prompt-to-image generation with local history.

use clap::{Args, Parser, Subcommand, ValueEnum};
use dalle_studio::{
    FileStore, GenerationError, ImageModel, ImageSize, OpenAiImageClient, Session, SessionError,
    SessionState,
};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dalle-studio")]
#[command(about = "Generate images from text prompts and keep a local history")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// State file holding the API key and history
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// API origin, for compatible proxies
    #[arg(long, global = true, default_value = dalle_studio::image::providers::DEFAULT_BASE_URL)]
    base_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a text prompt
    Generate(GenerateArgs),

    /// Store the API key
    SetKey {
        /// The API key (stored as-is)
        key: String,
    },

    /// List previously generated images, most recent first
    History,

    /// List models and the sizes each offers
    Models,

    /// Run the interactive generator (default)
    Interactive,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Model to use
    #[arg(short, long, value_enum, default_value = "dall-e-3")]
    model: ModelArg,

    /// Image size
    #[arg(short, long, value_enum, default_value = "1024x1024")]
    size: SizeArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    #[value(name = "dall-e-2")]
    DallE2,
    #[value(name = "dall-e-3")]
    DallE3,
}

impl From<ModelArg> for ImageModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::DallE2 => ImageModel::DallE2,
            ModelArg::DallE3 => ImageModel::DallE3,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    #[value(name = "256x256")]
    Small,
    #[value(name = "512x512")]
    Medium,
    #[value(name = "1024x1024")]
    Square,
    #[value(name = "1792x1024")]
    Wide,
}

impl From<SizeArg> for ImageSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Small => ImageSize::Small,
            SizeArg::Medium => ImageSize::Medium,
            SizeArg::Square => ImageSize::Square,
            SizeArg::Wide => ImageSize::Wide,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = FileStore::new(cli.state_file.clone().unwrap_or_else(default_state_file));
    tracing::debug!(path = %store.path().display(), "using state file");

    let client = OpenAiImageClient::builder()
        .base_url(&cli.base_url)
        .build();
    let mut session = Session::new(store);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Generate(args) => {
            generate_once(&mut session, &client, args, cli.json).await?;
        }
        Commands::SetKey { key } => {
            session.submit_credential(key);
            if cli.json {
                println!("{}", serde_json::json!({ "success": true }));
            } else {
                println!("API key saved.");
            }
        }
        Commands::History => {
            print_history(session.history(), cli.json)?;
        }
        Commands::Models => {
            list_models(cli.json)?;
        }
        Commands::Interactive => {
            run_interactive(&mut session, &client).await?;
        }
    }

    Ok(())
}

fn default_state_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".dalle-studio").join("state.json"),
        None => PathBuf::from(".dalle-studio.json"),
    }
}

fn validate_generate_args(args: &GenerateArgs) -> anyhow::Result<()> {
    let model = ImageModel::from(args.model);
    let size = ImageSize::from(args.size);
    if !model.supports(size) {
        anyhow::bail!("{model} does not offer size {size}");
    }
    Ok(())
}

async fn generate_once(
    session: &mut Session<FileStore>,
    client: &OpenAiImageClient,
    args: GenerateArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    validate_generate_args(&args)?;

    let form = session.form_mut();
    form.set_prompt(args.prompt);
    form.set_model(args.model.into());
    form.set_size(args.size.into());

    let image = match session.generate(client).await {
        Ok(image) => image,
        Err(SessionError::Generation(GenerationError::MissingCredential)) => {
            anyhow::bail!("no API key stored; run `dalle-studio set-key <KEY>` first");
        }
        Err(e) => return Err(e.into()),
    };

    if json_output {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "url": image.url,
            "model": image.metadata.model,
            "revised_prompt": image.metadata.revised_prompt,
            "duration_ms": image.metadata.duration_ms,
            "history_len": session.history().len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Generated image: {}", image.url);
        if let Some(duration) = image.metadata.duration_ms {
            println!("Duration: {}ms", duration);
        }
    }

    Ok(())
}

fn print_history(history: &[String], json_output: bool) -> anyhow::Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(history)?);
    } else if history.is_empty() {
        println!("No images generated yet.");
    } else {
        println!("History:");
        for (index, url) in history.iter().enumerate() {
            println!("  {:>3}. {}", index + 1, url);
        }
    }
    Ok(())
}

fn list_models(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct ModelInfo {
        model: &'static str,
        sizes: Vec<&'static str>,
        default: bool,
    }

    let models: Vec<ModelInfo> = ImageModel::ALL
        .iter()
        .map(|model| ModelInfo {
            model: model.as_str(),
            sizes: model.supported_sizes().iter().map(|s| s.as_str()).collect(),
            default: *model == ImageModel::default(),
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        println!("Available models:\n");
        for m in &models {
            let marker = if m.default { " (default)" } else { "" };
            println!("  {}{}", m.model, marker);
            println!("    sizes: {}", m.sizes.join(", "));
        }
    }

    Ok(())
}

const INTERACTIVE_HELP: &str = "\
Type a prompt and press enter to generate an image.
  /model <name>   select a model (dall-e-2, dall-e-3)
  /size <WxH>     select a size offered by the current model
  /key            enter a new API key
  /history        show generated images
  /help           show this help
  /quit           exit";

async fn run_interactive(
    session: &mut Session<FileStore>,
    client: &OpenAiImageClient,
) -> anyhow::Result<()> {
    println!("DALL-E Image Generator");
    println!("{INTERACTIVE_HELP}\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if session.credential_prompt_visible() {
            prompt_line("Enter API Key: ")?;
        } else {
            let form = session.form();
            prompt_line(&format!("[{} {}] > ", form.model(), form.size()))?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if session.state() == SessionState::NeedsCredential {
            match classify_key_input(&line) {
                KeyInput::Quit => break,
                KeyInput::Command(command) => {
                    eprintln!("{command} is unavailable until an API key is entered (/quit to exit)");
                }
                KeyInput::Key(key) => {
                    session.submit_credential(key);
                    println!("API key saved.");
                }
            }
            continue;
        }

        let line = line.trim();
        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => {}
            ("/quit" | "/exit", _) => break,
            ("/help", _) => println!("{INTERACTIVE_HELP}"),
            ("/history", _) => print_history(session.history(), false)?,
            ("/key", _) => {
                prompt_line("Enter API Key: ")?;
                if let Some(key) = lines.next_line().await? {
                    match classify_key_input(&key) {
                        KeyInput::Key(key) => {
                            session.submit_credential(key);
                            println!("API key saved.");
                        }
                        KeyInput::Quit | KeyInput::Command(_) => println!("API key unchanged."),
                    }
                }
            }
            ("/model", name) => match name.parse::<ImageModel>() {
                Ok(model) => {
                    session.form_mut().set_model(model);
                    print_size_options(session);
                }
                Err(e) => eprintln!("{e}"),
            },
            ("/size", value) => match value.parse::<ImageSize>() {
                Ok(size) => {
                    if !session.form_mut().set_size(size) {
                        print_size_options(session);
                    }
                }
                Err(e) => eprintln!("{e}"),
            },
            (command, _) if command.starts_with('/') => {
                eprintln!("unknown command: {command} (try /help)");
            }
            _ => {
                session.form_mut().set_prompt(line);
                println!("Generating...");
                match session.generate(client).await {
                    Ok(image) => println!("Generated image: {}", image.url),
                    Err(SessionError::Generation(GenerationError::MissingCredential)) => {}
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    }

    Ok(())
}

/// A line typed at the API key prompt.
#[derive(Debug, PartialEq, Eq)]
enum KeyInput<'a> {
    Quit,
    /// A slash command; never stored as a key.
    Command(&'a str),
    Key(&'a str),
}

fn classify_key_input(line: &str) -> KeyInput<'_> {
    let line = line.trim();
    match line {
        "/quit" | "/exit" => KeyInput::Quit,
        _ if line.starts_with('/') => {
            KeyInput::Command(line.split_whitespace().next().unwrap_or(line))
        }
        _ => KeyInput::Key(line),
    }
}

fn print_size_options(session: &Session<FileStore>) {
    let form = session.form();
    let options: Vec<&str> = form.size_options().iter().map(|s| s.as_str()).collect();
    println!("{} sizes: {}", form.model(), options.join(", "));
}

fn prompt_line(text: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}
