use std::path::PathBuf;
use std::time::Duration;

use canvas::engine::{EngineConfig, EngineCore};
use clap::{Args, Parser, Subcommand};
use frames::{Color, DrawEvent, Envelope, Event, FillEvent};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};


type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("websocket failed: {0}")]
    Ws(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("{path}:{line}: {source}")]
    ReplayLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: frames::CodecError,
    },
    #[error("brush width must be a positive number, got {0}")]
    InvalidWidth(f64),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("export failed: {0}")]
    Export(#[from] canvas::export::ExportError),
}

impl From<tokio_tungstenite::tungstenite::Error> for CliError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Ws(Box::new(error))
    }
}

#[derive(Parser, Debug)]
#[command(name = "sketch", about = "Headless peer for the sketch relay")]
struct Cli {
    #[arg(long, env = "SKETCH_RELAY_URL", default_value = "ws://127.0.0.1:3000/socket")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply every relayed event to a local canvas and save it as PNG.
    Watch(WatchArgs),
    /// Send recorded envelopes, one JSON object per line.
    Replay(ReplayArgs),
    /// Send one stroke point.
    Draw(DrawArgs),
    /// Send one flood fill.
    Fill(FillArgs),
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[arg(long, default_value_t = canvas::consts::DEFAULT_WIDTH)]
    width: u32,
    #[arg(long, default_value_t = canvas::consts::DEFAULT_HEIGHT)]
    height: u32,
    #[arg(long, default_value = "canvas.png")]
    out: PathBuf,
    /// Stop after this many applied events instead of waiting for Ctrl-C.
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    file: PathBuf,
    /// Pause between sends.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

#[derive(Args, Debug)]
struct DrawArgs {
    #[arg(long)]
    x: f64,
    #[arg(long)]
    y: f64,
    #[arg(long, default_value = "#000000")]
    color: Color,
    #[arg(long, default_value_t = canvas::consts::DEFAULT_BRUSH_WIDTH)]
    width: f64,
}

#[derive(Args, Debug)]
struct FillArgs {
    #[arg(long)]
    x: f64,
    #[arg(long)]
    y: f64,
    #[arg(long, default_value = "#000000")]
    color: Color,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Watch(args) => run_watch(&cli.url, args).await,
        Command::Replay(args) => run_replay(&cli.url, args).await,
        Command::Draw(args) => run_draw(&cli.url, args).await,
        Command::Fill(args) => run_fill(&cli.url, args).await,
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn run_watch(url: &str, args: WatchArgs) -> Result<(), CliError> {
    let mut stream = connect(url).await?;
    let mut core = EngineCore::with_config(EngineConfig { width: args.width, height: args.height, ..EngineConfig::default() });
    let mut applied = 0usize;

    loop {
        if args.limit.is_some_and(|limit| applied >= limit) {
            break;
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            text = recv_text(&mut stream) => {
                match text {
                    Ok(text) => {
                        if apply(&mut core, &text) {
                            applied += 1;
                        }
                    }
                    Err(CliError::WsClosed) => {
                        warn!("relay closed the connection");
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    let png = core.export_png()?;
    tokio::fs::write(&args.out, png).await?;
    eprintln!("applied {applied} events, wrote {}", args.out.display());
    Ok(())
}

async fn run_replay(url: &str, args: ReplayArgs) -> Result<(), CliError> {
    let contents = tokio::fs::read_to_string(&args.file).await?;
    let lines = parse_replay(&contents).map_err(|(line, source)| CliError::ReplayLine {
        path: args.file.clone(),
        line,
        source,
    })?;

    let mut stream = connect(url).await?;
    let total = lines.len();
    for (i, text) in lines.into_iter().enumerate() {
        stream.send(Message::text(text)).await?;
        if args.delay_ms > 0 && i + 1 < total {
            tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
        }
    }
    stream.close(None).await?;
    eprintln!("replayed {total} events");
    Ok(())
}

async fn run_draw(url: &str, args: DrawArgs) -> Result<(), CliError> {
    if !(args.width.is_finite() && args.width > 0.0) {
        return Err(CliError::InvalidWidth(args.width));
    }
    let event = Event::Drawing(DrawEvent { x: args.x, y: args.y, color: args.color, width: args.width });
    send_one(url, &event).await
}

async fn run_fill(url: &str, args: FillArgs) -> Result<(), CliError> {
    let event = Event::Fill(FillEvent { x: args.x, y: args.y, color: args.color });
    send_one(url, &event).await
}

// =============================================================================
// HELPERS
// =============================================================================

async fn connect(url: &str) -> Result<Socket, CliError> {
    let (stream, _) = connect_async(url).await?;
    info!(%url, "connected");
    Ok(stream)
}

async fn send_one(url: &str, event: &Event) -> Result<(), CliError> {
    let mut stream = connect(url).await?;
    stream.send(Message::text(frames::encode_event(event))).await?;
    stream.close(None).await?;
    eprintln!("sent {}", event.kind());
    Ok(())
}

async fn recv_text(stream: &mut Socket) -> Result<String, CliError> {
    loop {
        let Some(message) = stream.next().await else {
            return Err(CliError::WsClosed);
        };
        match message? {
            Message::Text(text) => return Ok(text.as_str().to_owned()),
            Message::Close(_) => return Err(CliError::WsClosed),
            _ => {}
        }
    }
}

/// Apply one relayed message; true when the canvas changed or was touched.
fn apply(core: &mut EngineCore, text: &str) -> bool {
    let touched = !core.apply_remote_text(text).is_empty();
    debug!(touched, "applied relay message");
    touched
}

/// Parse a recording into wire texts ready to send.
///
/// Blank lines are skipped. Each line must be an envelope; recorded origins
/// are stripped since the relay stamps its own. Events the relay would drop
/// are skipped with a warning.
fn parse_replay(contents: &str) -> Result<Vec<String>, (usize, frames::CodecError)> {
    let mut out = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let envelope = frames::decode_envelope(line).map_err(|e| (index + 1, e))?;
        if !envelope.is_relayable() {
            warn!(line = index + 1, event = %envelope.event, "skipping event the relay would drop");
            continue;
        }
        out.push(frames::encode_envelope(&Envelope { from: None, ..envelope }));
    }
    Ok(out)
}
