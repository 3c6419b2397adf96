use anyhow::Result;
use clap::{Parser, Subcommand};
use tubescript_local::{build_orchestrator, ConfigReport, Settings};

#[cfg(feature = "stdio")]
mod mcp;

#[derive(Parser, Debug)]
#[command(name = "tubescript")]
#[command(about = "YouTube transcript lookup (MCP stdio server)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as an MCP stdio server exposing `get_youtube_video_transcript`.
    #[cfg(feature = "stdio")]
    McpStdio,
    /// Look up one URL and print the result JSON (same payload as the MCP tool).
    Lookup(LookupCmd),
    /// Diagnose configuration/launch issues (json; no secrets).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct LookupCmd {
    /// YouTube video URL (watch, youtu.be, embed, v, shorts).
    url: String,
    /// Print single-line JSON instead of the pretty-printed tool payload.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    compact: bool,
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
    /// Spawn a child `tubescript mcp-stdio` and call `list_tools` to prove the server starts.
    ///
    /// No lookups are performed and no secret values are printed.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    check_stdio: bool,
    /// Timeout for the stdio handshake (ms).
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // stdout is the MCP channel; logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tubescript=info,tubescript_core=info,tubescript_local=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Env file first so RUST_LOG from it applies; it never overrides the process env.
    let env_file = tubescript_local::config::load_env_files();
    init_tracing();
    if let Err(e) = env_file {
        tracing::warn!(error = %e, "could not read env file");
    }

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "stdio")]
        Commands::McpStdio => {
            let settings = Settings::from_env()?;
            let lookup = build_orchestrator(&settings)?;
            mcp::serve_stdio(lookup)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        }
        Commands::Lookup(args) => {
            let settings = Settings::from_env()?;
            let lookup = build_orchestrator(&settings)?;
            let result = lookup.lookup(&args.url).await;
            if args.compact {
                println!("{}", serde_json::to_string(&result)?);
            } else {
                println!("{}", result.to_pretty_json()?);
            }
        }
        Commands::Doctor(args) => {
            let t0 = std::time::Instant::now();
            let report = ConfigReport::from_env();
            let config_ok = report.ok();

            let mut checks: Vec<serde_json::Value> = Vec::new();
            checks.push(serde_json::json!({
                "name": "config",
                "ok": config_ok,
                "message": if config_ok { "configuration is complete" } else { "configuration has problems" },
                "errors": report.errors.clone(),
                "hint": if config_ok { "" } else { "Set YOUTUBE_API_KEY (process env, TUBESCRIPT_ENV_FILE, or ./.env)." },
            }));

            let mut stdio_ok: Option<bool> = None;
            let mut stdio_tool_count: Option<usize> = None;
            let mut stdio_error: Option<serde_json::Value> = None;
            let mut stdio_elapsed_ms: Option<u128> = None;

            #[cfg(feature = "stdio")]
            if args.check_stdio {
                use rmcp::service::ServiceExt;
                use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
                use tokio::process::Command;

                let exe = std::env::current_exe()
                    .unwrap_or_else(|_| std::path::PathBuf::from("tubescript"));
                let child = TokioChildProcess::new(Command::new(exe).configure(|cmd| {
                    cmd.args(["mcp-stdio"]);
                    // Keep stderr quiet-ish for this probe.
                    cmd.env("RUST_LOG", "error");
                }))?;

                let check_t0 = std::time::Instant::now();
                match ().serve(child).await {
                    Ok(service) => {
                        let res = tokio::time::timeout(
                            std::time::Duration::from_millis(args.timeout_ms),
                            service.list_tools(Default::default()),
                        )
                        .await;
                        match res {
                            Ok(Ok(tools)) => {
                                stdio_ok = Some(true);
                                stdio_tool_count = Some(tools.tools.len());
                            }
                            Ok(Err(e)) => {
                                stdio_ok = Some(false);
                                stdio_error = Some(serde_json::json!({
                                    "code": "handshake_failed",
                                    "message": e.to_string(),
                                    "hint": "The child answered the handshake but list_tools failed. Reinstall `tubescript` and verify the client runs it with args: [\"mcp-stdio\"]."
                                }));
                            }
                            Err(_elapsed) => {
                                stdio_ok = Some(false);
                                stdio_error = Some(serde_json::json!({
                                    "code": "timeout",
                                    "message": format!("stdio handshake timed out after {}ms", args.timeout_ms),
                                    "hint": "The child did not respond to list_tools in time."
                                }));
                            }
                        }
                        let _ = service.cancel().await;
                    }
                    Err(e) => {
                        stdio_ok = Some(false);
                        stdio_error = Some(serde_json::json!({
                            "code": "handshake_failed",
                            "message": e.to_string(),
                            "hint": "The child closed the stdio transport early. Common causes: missing YOUTUBE_API_KEY (fatal at startup) or stdout contamination."
                        }));
                    }
                }
                stdio_elapsed_ms = Some(check_t0.elapsed().as_millis());
            }

            #[cfg(not(feature = "stdio"))]
            if args.check_stdio {
                stdio_ok = Some(false);
            }

            checks.push(serde_json::json!({
                "name": "mcp_stdio_handshake",
                "ok": if args.check_stdio { stdio_ok.unwrap_or(false) } else { true },
                "skipped": !args.check_stdio,
                "tool_count": stdio_tool_count,
                "elapsed_ms": stdio_elapsed_ms,
                "error": stdio_error,
            }));

            let all_ok = checks.iter().all(|c| c["ok"].as_bool().unwrap_or(false));
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "doctor",
                "ok": all_ok,
                "name": "tubescript",
                "version": env!("CARGO_PKG_VERSION"),
                "features": { "stdio": cfg!(feature = "stdio") },
                "configured": {
                    "youtube_api_key": report.api_key_configured,
                    "webshare_proxy": report.proxy_configured,
                    "proxy_retries_when_blocked": report.proxy_retries_when_blocked,
                    "transcript_languages": report.languages,
                    "youtube_api_base": report.api_base,
                },
                "checks": checks,
                "elapsed_ms": t0.elapsed().as_millis(),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => {
                    println!("tubescript {} doctor: ok={}", env!("CARGO_PKG_VERSION"), all_ok);
                    for c in v["checks"].as_array().into_iter().flatten() {
                        println!(
                            "- {}: {}",
                            c["name"].as_str().unwrap_or("?"),
                            if c["skipped"].as_bool() == Some(true) {
                                "skipped"
                            } else if c["ok"].as_bool() == Some(true) {
                                "ok"
                            } else {
                                "FAILED"
                            }
                        );
                    }
                }
                _ => println!("{}", v),
            }
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "tubescript",
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("tubescript {}", env!("CARGO_PKG_VERSION")),
                _ => println!("{}", v),
            }
        }
    }

    Ok(())
}
