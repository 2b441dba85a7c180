use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use paperdl::{
    ClientConfig, ConsoleProgressReporter, DownloadRequest, Downloader, IntoProgressCallback,
    OutputTarget, Selector,
    config::{DEFAULT_BASE_URL, api_root},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Download server builds from the PaperMC API
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Cli {
    /// Ex. paper, travertine, waterfall, velocity
    #[arg(short, long, default_value = "paper")]
    project: String,

    /// Version group X.XX, latest to use latest
    #[arg(short, long, default_value = "latest")]
    group: String,

    /// Subversion X.XX.X, latest to use latest version
    #[arg(short, long, default_value = "latest")]
    version: String,

    /// Build of version, latest to use latest build
    #[arg(short, long, default_value = "latest")]
    build: String,

    /// Output file name, source to use source name
    #[arg(short, long, default_value = "source")]
    output: String,

    /// Verbose output
    #[arg(long)]
    verbose: bool,

    /// Which download of the build to fetch
    #[arg(short, long, default_value = "application")]
    download: String,

    /// List available projects and exit
    #[arg(long)]
    projects: bool,

    /// List the downloads of the resolved build and exit
    #[arg(long)]
    downloads: bool,

    /// Check the downloaded file against the build's SHA-256
    #[arg(long)]
    verify: bool,

    /// Request timeout in seconds (default: wait forever)
    #[arg(long)]
    timeout: Option<u64>,

    /// API root; a bare host such as https://api.papermc.io gets /v2 appended
    #[arg(long, env = "PAPER_MC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

impl Cli {
    fn request(&self) -> DownloadRequest {
        DownloadRequest::new(self.project.as_str())
            .with_group(Selector::from(self.group.as_str()))
            .with_version(Selector::from(self.version.as_str()))
            .with_build(Selector::from(self.build.as_str()))
            .with_output(OutputTarget::from(self.output.as_str()))
            .with_download(self.download.as_str())
            .with_checksum_verification(self.verify)
    }

    fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::default().with_base_url(api_root(&self.base_url));
        match self.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        println!("Project: {}", cli.project);
        println!("Group: {}", cli.group);
        println!("Version: {}", cli.version);
        println!("Build: {}", cli.build);
        println!("Output: {}", cli.output);
    }

    let config = cli.client_config();
    debug!("API root: {}", config.base_url);
    let downloader = Downloader::new(&config)?;

    if cli.projects {
        let list = downloader.projects().await?;
        println!("Available projects: {}", list.projects.join(", "));
        return Ok(());
    }

    let request = cli.request();
    debug!("Request: {:?}", request);

    if cli.downloads {
        let info = downloader.build_info(&request).await?;
        println!("{} {} build {} ({})", info.project_name, info.version, info.build, info.time);
        for (key, download) in &info.downloads {
            println!("  {}: {} sha256={}", key, download.name, download.sha256);
        }
        return Ok(());
    }

    let progress = cli.verbose.then(|| ConsoleProgressReporter.into_callback());
    let report = downloader.download(&request, progress).await?;

    if cli.verbose {
        println!(
            "Saved {} build {} to {} ({} bytes, sha256 {}{})",
            report.resolution.version,
            report.resolution.build,
            report.resolution.output.display(),
            report.bytes_written,
            report.sha256,
            if report.verified { ", verified" } else { "" },
        );
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        println!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_match_latest_paper() {
        let cli = Cli::try_parse_from(["paperdl"]).unwrap();
        let request = cli.request();

        assert_eq!(request.project, "paper");
        assert_eq!(request.group, Selector::Latest);
        assert_eq!(request.version, Selector::Latest);
        assert_eq!(request.build, Selector::Latest);
        assert_eq!(request.output, OutputTarget::SourceName);
        assert_eq!(request.download, "application");
        assert!(!request.verify_checksum);
        assert!(!cli.verbose);
        assert!(cli.client_config().timeout.is_none());
    }

    #[test]
    fn test_explicit_flags_flow_into_request() {
        let cli = Cli::try_parse_from([
            "paperdl", "-p", "velocity", "-g", "3.0.0", "-v", "3.1.1", "-b", "102", "-o",
            "proxy.jar", "--verify", "--timeout", "30",
        ])
        .unwrap();
        let request = cli.request();

        assert_eq!(request.project, "velocity");
        assert_eq!(request.group, Selector::explicit("3.0.0"));
        assert_eq!(request.version, Selector::explicit("3.1.1"));
        assert_eq!(request.build, Selector::explicit("102"));
        assert_eq!(request.output, OutputTarget::Path(PathBuf::from("proxy.jar")));
        assert!(request.verify_checksum);
        assert_eq!(cli.client_config().timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_bare_host_base_url_gets_api_version() {
        let cli =
            Cli::try_parse_from(["paperdl", "--base-url", "https://api.papermc.io"]).unwrap();
        assert_eq!(cli.client_config().base_url, "https://api.papermc.io/v2");

        let cli = Cli::try_parse_from(["paperdl"]).unwrap();
        assert_eq!(cli.client_config().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_verbose_is_long_only() {
        assert!(Cli::try_parse_from(["paperdl", "--verbose"]).unwrap().verbose);
        // -v is the version selector and needs a value
        assert!(Cli::try_parse_from(["paperdl", "-v"]).is_err());
    }
}
