// # dns01d - cert-manager DNS-01 webhook daemon
//
// This daemon is a THIN integration layer:
// - DO NOT add reconciliation or provider logic here
// - All record handling lives in dns01-core and the provider crates
// - Configuration is via environment variables ONLY
//
// The dns01d daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the Kubernetes secret store and the deSEC provider into a solver
// 4. Serving the webhook endpoint until SIGTERM/SIGINT
//
// The daemon serves the API discovery document for its group; TLS
// termination and the APIService object itself are handled by the
// deployment in front of this process.
//
// ## Configuration
//
// ### Webhook
// - `GROUP_NAME`: API group cert-manager addresses the solver under (required)
// - `SOLVER_NAME`: Solver name within the group (default: desec)
// - `DNS01_LISTEN_ADDR`: Socket address to listen on (default: 0.0.0.0:8443)
//
// ### Provider
// - `DESEC_API_URL`: deSEC API base URL (default: https://desec.io/api/v1)
// - `DNS01_MODE`: `live` or `dry-run` (default: live)
//
// ### Logging
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export GROUP_NAME=acme.example.com
// export DNS01_LISTEN_ADDR=0.0.0.0:8443
//
// dns01d
// ```

mod server;

use anyhow::Result;
use dns01_core::{CredentialResolver, DEFAULT_SOLVER_NAME, Solver};
use dns01_provider_desec::{DESEC_API_BASE, DesecFactory};
use dns01_secret_kube::KubeSecretStore;
use std::env;
use std::future::Future;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum Dns01ExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<Dns01ExitCode> for ExitCode {
    fn from(code: Dns01ExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    group_name: String,
    solver_name: String,
    listen_addr: String,
    desec_api_url: String,
    mode: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            group_name: var("GROUP_NAME", ""),
            solver_name: var("SOLVER_NAME", DEFAULT_SOLVER_NAME),
            listen_addr: var("DNS01_LISTEN_ADDR", "0.0.0.0:8443"),
            desec_api_url: var("DESEC_API_URL", DESEC_API_BASE),
            mode: var("DNS01_MODE", "live"),
            log_level: var("DNS01_LOG_LEVEL", "info"),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.group_name.is_empty() {
            anyhow::bail!(
                "GROUP_NAME must be specified. \
                Set it via: export GROUP_NAME=acme.example.com"
            );
        }
        validate_domain_name(&self.group_name)
            .map_err(|e| anyhow::anyhow!("GROUP_NAME is not a valid API group: {}", e))?;

        if self.solver_name.contains('/') {
            anyhow::bail!(
                "SOLVER_NAME '{}' must not contain '/'",
                self.solver_name
            );
        }

        self.socket_addr()?;

        if !self.desec_api_url.starts_with("https://") && !self.desec_api_url.starts_with("http://")
        {
            anyhow::bail!(
                "DESEC_API_URL must use HTTP or HTTPS scheme. Got: {}",
                self.desec_api_url
            );
        }

        match self.mode.as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "DNS01_MODE '{}' is not supported. Supported modes: live, dry-run",
                self.mode
            ),
        }

        self.level()?;

        Ok(())
    }

    fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|e| {
            anyhow::anyhow!(
                "DNS01_LISTEN_ADDR '{}' is not a socket address: {}",
                self.listen_addr,
                e
            )
        })
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DNS01_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    fn dry_run(&self) -> bool {
        self.mode == "dry-run"
    }
}

/// Validate that a string is a valid domain name
///
/// Basic RFC 1035 checks; API group names follow the same rules.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.len() > 253 {
        anyhow::bail!("too long: {} chars (max 253)", domain.len());
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("empty label in '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!("label '{}' too long: {} chars (max 63)", label, label.len());
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            anyhow::bail!(
                "label '{}' contains invalid characters (alphanumeric and hyphen only)",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!("label '{}' cannot start or end with hyphen", label);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    info!("Starting dns01d daemon");
    info!(
        "Serving solver {}/{} in {} mode",
        config.group_name, config.solver_name, config.mode
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Dns01ExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            Dns01ExitCode::RuntimeError
        } else {
            Dns01ExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let addr = config.socket_addr()?;

    let secrets = KubeSecretStore::try_default().await?;
    let factory = DesecFactory::new(config.desec_api_url.clone(), config.dry_run());
    let credentials = CredentialResolver::new(Arc::new(secrets), Arc::new(factory));
    let solver = Solver::with_name(config.solver_name.clone(), credentials);

    let app = server::router(server::AppState::new(&config.group_name, solver));
    let shutdown = shutdown_signal()?;

    info!("Listening on {}", addr);
    axum::Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(async move {
            let signal = shutdown.await;
            info!("Received shutdown signal: {}", signal);
        })
        .await?;

    info!("Daemon stopped");
    Ok(())
}

/// Install handlers for shutdown signals (SIGTERM, SIGINT)
///
/// Returns a future resolving to the name of the first signal received.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
}

/// Fallback for non-Unix platforms (CTRL-C only)
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to wait for CTRL-C: {}", e);
        }
        "SIGINT"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[("GROUP_NAME", "acme.example.com")]);
        cfg.validate().unwrap();

        assert_eq!(cfg.solver_name, "desec");
        assert_eq!(cfg.listen_addr, "0.0.0.0:8443");
        assert_eq!(cfg.desec_api_url, DESEC_API_BASE);
        assert!(!cfg.dry_run());
        assert_eq!(cfg.level().unwrap(), Level::INFO);
    }

    #[test]
    fn group_name_is_required() {
        let err = config(&[]).validate().unwrap_err();
        assert!(err.to_string().contains("GROUP_NAME must be specified"));

        let err = config(&[("GROUP_NAME", "   ")]).validate().unwrap_err();
        assert!(err.to_string().contains("GROUP_NAME must be specified"));
    }

    #[test]
    fn group_name_must_be_domain_like() {
        assert!(config(&[("GROUP_NAME", "acme..example.com")]).validate().is_err());
        assert!(config(&[("GROUP_NAME", "acme_example.com")]).validate().is_err());
        assert!(config(&[("GROUP_NAME", "-acme.example.com")]).validate().is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = [("GROUP_NAME", "acme.example.com")];

        for (key, value) in [
            ("DNS01_LISTEN_ADDR", "localhost"),
            ("DNS01_MODE", "maybe"),
            ("DNS01_LOG_LEVEL", "loud"),
            ("DESEC_API_URL", "ftp://desec.io"),
            ("SOLVER_NAME", "de/sec"),
        ] {
            let mut vars = base.to_vec();
            vars.push((key, value));
            let err = config(&vars).validate().unwrap_err();
            assert!(err.to_string().contains(key), "{}: {}", key, err);
        }
    }

    #[test]
    fn dry_run_mode_and_overrides() {
        let cfg = config(&[
            ("GROUP_NAME", "acme.example.com"),
            ("SOLVER_NAME", "desec-staging"),
            ("DNS01_LISTEN_ADDR", "127.0.0.1:9443"),
            ("DNS01_MODE", "dry-run"),
            ("DNS01_LOG_LEVEL", "DEBUG"),
        ]);
        cfg.validate().unwrap();

        assert!(cfg.dry_run());
        assert_eq!(cfg.solver_name, "desec-staging");
        assert_eq!(cfg.socket_addr().unwrap().port(), 9443);
        assert_eq!(cfg.level().unwrap(), Level::DEBUG);
    }
}
