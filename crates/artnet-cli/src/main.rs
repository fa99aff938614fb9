use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use artnet_core::{
    ARTNET_PORT, AddressRequest, DEFAULT_FPS, DMX_MAX_SLOTS, EncodeError, IpProgRequest, OpCode,
    Packet, PortAddress, Session, SessionConfig, SessionError,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{Level, debug, warn};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("ARTNET_BUILD_COMMIT"),
    " ",
    env!("ARTNET_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "artnet")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Art-Net v14 client: discover nodes, watch traffic, send DMX and node settings.",
    long_about = None,
    after_help = "Examples:\n  artnet poll --timeout 3\n  artnet listen --forever --pretty\n  artnet --target 2.0.0.10 dmx --universe 1 --data 255,0,128\n  artnet dmx --net 0 --subnet 1 --uni 2 --fill 255 --frames 40"
)]
struct Cli {
    /// JSON session config; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Destination address, with or without port (default 255.255.255.255:6454)
    #[arg(long, global = true, value_parser = parse_endpoint)]
    target: Option<SocketAddr>,

    /// Local address to bind, with or without port (default 0.0.0.0:6454)
    #[arg(long, global = true, value_parser = parse_endpoint)]
    bind: Option<SocketAddr>,

    /// Do not enable SO_BROADCAST on the socket
    #[arg(long, global = true)]
    no_broadcast: bool,

    /// Log at debug level regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send ArtPoll and print every reply as a JSON line.
    Poll(ListenArgs),
    /// Print every decoded Art-Net packet as a JSON line.
    #[command(alias = "receive")]
    Listen(ListenArgs),
    /// Send one or more ArtDmx frames.
    #[command(
        after_help = "Examples:\n  artnet dmx --universe 0 --data 255,128,0\n  artnet dmx --net 1 --subnet 0 --uni 3 --fill 10 --channels 24 --frames 80 --fps 40"
    )]
    Dmx(FrameArgs),
    /// Send ArtNzs frames (DMX with a non-zero start code).
    Nzs {
        /// Alternative start code (non-zero)
        #[arg(long)]
        start_code: u8,

        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Send ArtSync so nodes latch buffered DMX.
    Sync,
    /// Send ArtTrigger.
    Trigger {
        /// 0 ascii, 1 macro, 2 soft, 3 show
        #[arg(long)]
        key: u8,

        #[arg(long, default_value_t = 0)]
        sub_key: u8,

        /// Payload as hex, e.g. 0a1b2c
        #[arg(long)]
        data: Option<String>,
    },
    /// Program a node's Net/Sub-Net/Universe and names with ArtAddress.
    Address {
        #[arg(long, default_value_t = 0)]
        net: u8,

        #[arg(long, default_value_t = 0)]
        sub: u8,

        #[arg(long, default_value_t = 0)]
        universe: u8,

        #[arg(long, default_value = "")]
        short_name: String,

        #[arg(long, default_value = "")]
        long_name: String,
    },
    /// Program or query a node's IP settings with ArtIpProg.
    #[command(name = "ip-prog")]
    IpProg {
        /// Switch the node to DHCP (other settings are ignored)
        #[arg(long)]
        dhcp: bool,

        #[arg(long)]
        ip: Option<Ipv4Addr>,

        #[arg(long)]
        subnet: Option<Ipv4Addr>,

        #[arg(long)]
        gateway: Option<Ipv4Addr>,

        #[arg(long)]
        port: Option<u16>,

        /// Restore factory IP, subnet and gateway
        #[arg(long)]
        reset: bool,
    },
    /// Send an ArtCommand text, e.g. "SwoutText=Playback&".
    Command {
        text: String,

        /// ESTA manufacturer code; 0xffff addresses every manufacturer
        #[arg(long, default_value_t = 0xffff)]
        esta_man: u16,
    },
}

#[derive(Args, Debug)]
struct ListenArgs {
    /// Return after this many idle seconds
    #[arg(long, conflicts_with = "forever")]
    timeout: Option<f64>,

    /// Listen until interrupted
    #[arg(long)]
    forever: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// 15-bit Port-Address (0-32767)
    #[arg(long, conflicts_with_all = ["net", "subnet", "uni"])]
    universe: Option<u16>,

    #[arg(long)]
    net: Option<u8>,

    #[arg(long)]
    subnet: Option<u8>,

    /// Universe within the Sub-Net (0-15)
    #[arg(long)]
    uni: Option<u8>,

    /// First sequence number; 0 disables sequencing
    #[arg(long, default_value_t = 1)]
    sequence: u8,

    /// Comma-separated channel values
    #[arg(long, conflicts_with_all = ["fill", "channels"])]
    data: Option<String>,

    /// Value for every channel when --data is absent
    #[arg(long, default_value_t = 0)]
    fill: u8,

    #[arg(long, default_value_t = DMX_MAX_SLOTS)]
    channels: usize,

    #[arg(long, default_value_t = 1)]
    frames: u32,

    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: f64,

    /// Send ArtSync after each frame
    #[arg(long)]
    sync: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    if let Some(target) = cli.target {
        config.target = target;
    }
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if cli.no_broadcast {
        config.broadcast = false;
    }
    debug!(?config, "session config resolved");

    match cli.command {
        Commands::Poll(args) => cmd_poll(config, args),
        Commands::Listen(args) => cmd_listen(config, args),
        Commands::Dmx(frame) => cmd_frames(config, None, frame),
        Commands::Nzs { start_code, frame } => cmd_frames(config, Some(start_code), frame),
        Commands::Sync => Ok(Session::open(config)?.send_sync()?),
        Commands::Trigger { key, sub_key, data } => {
            let data = match data {
                Some(hex) => parse_hex(&hex)?,
                None => Vec::new(),
            };
            Ok(Session::open(config)?.send_trigger(key, sub_key, &data)?)
        }
        Commands::Address {
            net,
            sub,
            universe,
            short_name,
            long_name,
        } => {
            let request = AddressRequest {
                short_name,
                long_name,
                ..AddressRequest::new(net, sub, universe)
            };
            let port_address = Session::open(config)?.configure_address(&request)?;
            eprintln!("OK: Port-Address {} ({}) sent", port_address, port_address.as_u16());
            Ok(())
        }
        Commands::IpProg {
            dhcp,
            ip,
            subnet,
            gateway,
            port,
            reset,
        } => {
            let request = IpProgRequest {
                dhcp,
                prog_ip: ip,
                prog_subnet: subnet,
                prog_gateway: gateway,
                prog_port: port,
                reset,
            };
            Ok(Session::open(config)?.configure_ip(&request)?)
        }
        Commands::Command { text, esta_man } => {
            Ok(Session::open(config)?.send_command(esta_man, &text)?)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        let hint = match &err {
            SessionError::Io(_) => "check --bind and --target; another program may hold the port",
            SessionError::Encode(EncodeError::PayloadTooLarge { .. }) => {
                "DMX frames carry at most 512 channels and commands at most 511 characters"
            }
            SessionError::Encode(EncodeError::OutOfRange { .. }) => {
                "Net is 0-127, Sub-Net and Universe are 0-15, a 15-bit universe is 0-32767"
            }
            SessionError::Encode(EncodeError::NonAscii { .. }) => "use ASCII text only",
            SessionError::InvalidTimeout { .. } => "use a positive --timeout or --forever",
            SessionError::InvalidBufferSize { .. } => {
                "raise recv_buffer_size in the config file (default 1024)"
            }
        };
        CliError::new(err.to_string(), Some(hint.to_string()))
    }
}

fn load_config(path: &Path) -> Result<SessionConfig, CliError> {
    if !path.is_file() {
        return Err(CliError::new(
            format!("config file not found: {}", path.display()),
            Some("pass a JSON session config, e.g. {\"target\": \"2.255.255.255:6454\"}".to_string()),
        ));
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid session config: {}", path.display()))?;
    Ok(config)
}

/// One received packet as printed on stdout.
#[derive(Serialize)]
struct Received<'a> {
    received_at: String,
    source: SocketAddr,
    packet: &'a Packet,
}

fn print_packet(pretty: bool, source: SocketAddr, packet: &Packet) {
    let received_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());
    let line = Received {
        received_at,
        source,
        packet,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&line)
    } else {
        serde_json::to_string(&line)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(err) => warn!(%source, %err, "JSON serialization failed"),
    }
}

fn apply_listen_args(config: &mut SessionConfig, args: &ListenArgs) {
    if args.forever {
        config.listen_timeout_secs = None;
    } else if let Some(timeout) = args.timeout {
        config.listen_timeout_secs = Some(timeout);
    }
}

fn cmd_poll(mut config: SessionConfig, args: ListenArgs) -> Result<(), CliError> {
    apply_listen_args(&mut config, &args);
    let pretty = args.pretty;

    let mut session = Session::open(config)?;
    session.subscribe(OpCode::PollReply, move |_, from, packet| {
        print_packet(pretty, from, packet)
    });
    session.subscribe(OpCode::Poll, move |_, from, packet| {
        print_packet(pretty, from, packet)
    });
    session.send_poll()?;
    session.listen_configured()?;
    Ok(())
}

fn cmd_listen(mut config: SessionConfig, args: ListenArgs) -> Result<(), CliError> {
    apply_listen_args(&mut config, &args);
    let pretty = args.pretty;

    let mut session = Session::open(config)?;
    session.subscribe_all(move |_, from, packet| print_packet(pretty, from, packet));
    session.listen_configured()?;
    Ok(())
}

fn cmd_frames(
    config: SessionConfig,
    start_code: Option<u8>,
    frame: FrameArgs,
) -> Result<(), CliError> {
    let universe = resolve_universe(&frame)?;
    let data = match frame.data.as_deref() {
        Some(values) => parse_channels(values)?,
        None if frame.channels > DMX_MAX_SLOTS => {
            return Err(SessionError::from(EncodeError::PayloadTooLarge {
                len: frame.channels,
                max: DMX_MAX_SLOTS,
            })
            .into());
        }
        None => vec![frame.fill; frame.channels],
    };
    let interval = frame_interval(frame.fps)?;

    let session = Session::open(config)?;
    let mut sequence = frame.sequence;
    for index in 0..frame.frames {
        if index > 0 {
            thread::sleep(interval);
        }
        match start_code {
            Some(start_code) => session.send_nzs(universe.as_u16(), sequence, start_code, &data)?,
            None => session.send_dmx(universe.as_u16(), sequence, &data)?,
        }
        if frame.sync {
            session.send_sync()?;
        }
        sequence = next_sequence(sequence);
    }
    debug!(%universe, frames = frame.frames, "frames sent");
    Ok(())
}

/// Time between frames; rejects rates whose period a `Duration` cannot hold.
fn frame_interval(fps: f64) -> Result<Duration, CliError> {
    Duration::try_from_secs_f64(1.0 / fps)
        .ok()
        .filter(|_| fps.is_finite() && fps > 0.0)
        .ok_or_else(|| {
            CliError::new(
                format!("invalid frame rate: {fps}"),
                Some("use a positive --fps, e.g. 40".to_string()),
            )
        })
}

fn resolve_universe(frame: &FrameArgs) -> Result<PortAddress, SessionError> {
    let address = match frame.universe {
        Some(universe) => PortAddress::try_from(universe)?,
        None => PortAddress::new(
            frame.net.unwrap_or(0),
            frame.subnet.unwrap_or(0),
            frame.uni.unwrap_or(0),
        )?,
    };
    Ok(address)
}

/// Sequence 0 means "not sequenced"; otherwise wrap within 1..=255.
fn next_sequence(sequence: u8) -> u8 {
    match sequence {
        0 => 0,
        u8::MAX => 1,
        other => other + 1,
    }
}

fn parse_channels(values: &str) -> Result<Vec<u8>, CliError> {
    values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<u8>().map_err(|_| {
                CliError::new(
                    format!("invalid channel value '{value}'"),
                    Some("channel values are integers 0-255 separated by commas".to_string()),
                )
            })
        })
        .collect()
}

fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let invalid = || {
        CliError::new(
            format!("invalid hex payload '{text}'"),
            Some("use an even number of hex digits, e.g. 0a1b2c".to_string()),
        )
    };
    if text.len() % 2 != 0 || !text.is_ascii() {
        return Err(invalid());
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).map_err(|_| invalid()))
        .collect()
}

/// Accepts `ip:port` or a bare IP, which gets the Art-Net port.
fn parse_endpoint(value: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr);
    }
    value
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, ARTNET_PORT))
        .map_err(|_| format!("'{value}' is not an IP address or ip:port"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{frame_interval, next_sequence, parse_channels, parse_endpoint, parse_hex};

    #[test]
    fn sequence_wraps_past_zero() {
        assert_eq!(next_sequence(0), 0);
        assert_eq!(next_sequence(1), 2);
        assert_eq!(next_sequence(255), 1);
    }

    #[test]
    fn channels_parse_with_spaces() {
        assert_eq!(parse_channels("255, 0,128").unwrap(), vec![255, 0, 128]);
        assert!(parse_channels("256").is_err());
    }

    #[test]
    fn frame_interval_rejects_unrepresentable_rates() {
        assert_eq!(frame_interval(4.0).unwrap(), Duration::from_millis(250));
        for fps in [1e-300, 0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = frame_interval(fps).unwrap_err();
            assert!(err.message.starts_with("invalid frame rate"));
            assert!(err.hint.is_some());
        }
    }

    #[test]
    fn hex_payload_parses_pairs() {
        assert_eq!(parse_hex("0aff").unwrap(), vec![0x0a, 0xff]);
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn endpoint_defaults_to_artnet_port() {
        assert_eq!(
            parse_endpoint("10.0.0.255").unwrap().to_string(),
            "10.0.0.255:6454"
        );
        assert_eq!(
            parse_endpoint("127.0.0.1:9000").unwrap().to_string(),
            "127.0.0.1:9000"
        );
        assert!(parse_endpoint("nope").is_err());
    }
}
