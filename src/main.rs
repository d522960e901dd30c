//! domcurl CLI
//!
//! Fetch a URL through headless Chromium and print the rendered DOM.

use clap::error::ErrorKind;
use clap::Parser;
use domcurl::browser::NavigationDriver;
use domcurl::cookie::Cookie;
use domcurl::headers::header_map;
use domcurl::options::{NavigationOptions, Viewport, WaitUntil};
use domcurl::output::Sink;
use std::path::PathBuf;
use std::process::ExitCode;
use url::Url;

/// curl for rendered pages
#[derive(Parser, Debug)]
#[command(name = "domcurl")]
#[command(about = "Fetch a URL through headless Chromium and print the rendered DOM")]
#[command(disable_version_flag = true)]
struct Args {
    /// Target URL
    #[arg(value_name = "URL")]
    target: Option<String>,

    /// Target URL (alternative to the positional form)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Maximum navigation time in seconds
    #[arg(short = 'm', long = "max-time", default_value_t = 30, value_name = "SECONDS")]
    max_time: u64,

    /// Print request and response headers
    #[arg(short, long)]
    verbose: bool,

    /// User agent override
    #[arg(short = 'A', long = "user-agent", value_name = "AGENT")]
    user_agent: Option<String>,

    /// Extra header as "Name: Value", repeatable
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    header: Vec<String>,

    /// Referer URL
    #[arg(short = 'e', long = "referer", value_name = "URL")]
    referer: Option<String>,

    /// Cookie as "Name=Value; attrs", repeatable
    #[arg(short = 'b', long = "cookie", value_name = "COOKIE")]
    cookie: Vec<String>,

    /// Write the DOM to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,

    /// HTTP method override for the main request
    #[arg(short = 'X', long = "request", value_name = "METHOD")]
    request: Option<String>,

    /// Request body for the main request
    #[arg(short = 'd', long = "data", value_name = "DATA")]
    data: Option<String>,

    /// Viewport as WIDTHxHEIGHT (e.g., 1920x1080)
    #[arg(short = 'V', long = "viewport", value_name = "WxH")]
    viewport: Option<Viewport>,

    /// When navigation counts as finished
    #[arg(long, default_value = "networkidle0", value_name = "EVENT")]
    waituntil: WaitUntil,

    /// Write a performance trace to a file
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Redirect diagnostics to a file, or "-" for stdout
    #[arg(long, value_name = "FILE")]
    stderr: Option<String>,

    /// Print the version and exit
    #[arg(long)]
    version: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn fail(diag: &Sink, message: &str) -> ExitCode {
    let _ = diag.write_line(message);
    let _ = diag.flush();
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let helpish = matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
            let _ = e.print();
            return if helpish {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    init_tracing();

    // Diagnostics default to stderr; "-" redirects them onto stdout.
    let diag = match args.stderr.as_deref() {
        None => Sink::stderr(),
        Some("-") => Sink::stdout(),
        Some("") => {
            return fail(
                &Sink::stderr(),
                "--stderr must be a filename if argument is present",
            )
        }
        Some(path) => match Sink::file(path) {
            Ok(sink) => sink,
            Err(e) => return fail(&Sink::stderr(), &format!("cannot open --stderr file: {e}")),
        },
    };

    let out = match args.output.as_deref() {
        None | Some("") => Sink::stdout(),
        Some(path) => match Sink::file(path) {
            Ok(sink) => sink,
            Err(e) => return fail(&diag, &format!("cannot open --output file: {e}")),
        },
    };

    if args.version {
        let _ = out.write_line(domcurl::VERSION);
        let _ = out.flush();
        return ExitCode::SUCCESS;
    }

    if args.max_time == 0 {
        return fail(&diag, "--max-time can only be a number greater than 0");
    }

    let target = match args.url.or(args.target) {
        Some(target) => target,
        None => return fail(&diag, "URL must be specified"),
    };

    let referer = match args.referer.as_deref() {
        None => None,
        Some(raw) => match Url::parse(raw) {
            Ok(url) => Some(url.to_string()),
            Err(_) => return fail(&diag, "-e --referer is not a valid URL"),
        },
    };

    let cookies = match Cookie::parse_all(&args.cookie) {
        Ok(cookies) => cookies,
        Err(e) => return fail(&diag, &e.to_string()),
    };

    let mut builder = NavigationOptions::builder(target)
        .wait_until(args.waituntil)
        .max_time_ms(args.max_time * 1000)
        .headers(header_map(&args.header))
        .cookies(cookies)
        .echo_headers(args.verbose);

    if let Some(method) = args.request {
        builder = builder.method(method);
    }
    if let Some(data) = args.data {
        builder = builder.body(data);
    }
    if let Some(referer) = referer {
        builder = builder.referer(referer);
    }
    if let Some(ua) = args.user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(viewport) = args.viewport {
        builder = builder.viewport(viewport);
    }
    if let Some(trace) = args.trace {
        builder = builder.trace_path(trace);
    }

    let options = match builder.build() {
        Ok(options) => options,
        Err(_) => return fail(&diag, "--url or default value is not a valid URL"),
    };

    match NavigationDriver::new(options, out).run().await {
        Ok(()) => {
            let _ = diag.flush();
            ExitCode::SUCCESS
        }
        Err(e) => fail(&diag, &e.to_string()),
    }
}
