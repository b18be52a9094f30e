use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tracing::{info, warn};

use profile_scout::core::config::load_scout_config;
use profile_scout::features::session_store::{load_cookie_file, locate_cookie_file};
use profile_scout::scraping::browser_manager::BrowserSession;
use profile_scout::scraping::stealth;
use profile_scout::{AuthWallPolicy, BatchOutcome, Cookie, ProfileScout, SelectorTable};

const USAGE: &str = "usage: profile-scout [-u URL[,URL...]]... [-i urls.txt] [-o out.json] [--continue-on-auth-wall]";

#[derive(Debug, Default)]
struct CliArgs {
    urls: Vec<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    policy: AuthWallPolicy,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "-u" | "--url" => {
                let v = args.next().ok_or_else(|| anyhow!("{} needs a value", a))?;
                parsed.urls.extend(
                    v.split(',')
                        .map(str::trim)
                        .filter(|u| !u.is_empty())
                        .map(str::to_string),
                );
            }
            "-i" | "--input" => {
                parsed.input = Some(args.next().ok_or_else(|| anyhow!("{} needs a path", a))?.into());
            }
            "-o" | "--output" => {
                parsed.output = Some(args.next().ok_or_else(|| anyhow!("{} needs a path", a))?.into());
            }
            "--continue-on-auth-wall" => parsed.policy = AuthWallPolicy::Continue,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(anyhow!("unknown argument '{}'\n{}", other, USAGE)),
        }
    }
    Ok(parsed)
}

/// One URL per line; blank lines and `#` comments are skipped.
fn read_url_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading url list {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

async fn run<P: profile_scout::BrowsingPage>(
    scout: &ProfileScout<P>,
    cookies: Vec<Cookie>,
    urls: &[String],
    policy: AuthWallPolicy,
) -> anyhow::Result<BatchOutcome> {
    scout.install_cookies(cookies).await?;
    scout.validate_session().await?;
    Ok(scout.scrape_all(urls, policy).await)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,chromiumoxide=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let mut urls = args.urls;
    if let Some(path) = &args.input {
        urls.extend(read_url_file(path)?);
    }
    if urls.is_empty() {
        eprintln!("{USAGE}");
        std::process::exit(2);
    }

    let config = load_scout_config();
    let selectors = match config.resolve_selectors_path() {
        Some(path) => SelectorTable::load(&path)?,
        None => SelectorTable::default(),
    };
    info!("selector table {}", selectors.version);

    let cookie_path = locate_cookie_file(&config.resolve_cookies_path());
    let cookies = load_cookie_file(&cookie_path)?;

    let session = BrowserSession::launch(&config).await?;
    stealth::install(session.page()).await;
    let scout = ProfileScout::new(session.page().clone(), config, selectors);

    let result = run(&scout, cookies, &urls, args.policy).await;
    session.shutdown().await;
    let outcome = result?;

    let json = serde_json::to_string_pretty(&outcome.records)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("💾 {} records written to {}", outcome.records.len(), path.display());
        }
        None => println!("{json}"),
    }

    for failure in &outcome.failures {
        warn!("failed: {} ({})", failure.url, failure.reason);
    }
    if outcome.aborted {
        std::process::exit(3);
    }
    Ok(())
}
