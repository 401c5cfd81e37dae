//! `scmctl` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: load the optional TOML file and apply
//!    command-line overrides.
//! 2. **Wire observability**: install `tracing-subscriber` with a JSON or
//!    human formatter and, when an endpoint is configured, an OpenTelemetry
//!    OTLP exporter. Spans from every crate in the workspace flow through it.
//! 3. **Construct infrastructure**: build the Gitee [`scm::Client`] and wrap it
//!    in the credentialed [`access::GitService`].
//! 4. **Run one command** and print its result as JSON on stdout.

use std::path::PathBuf;
use std::sync::Arc;

use access::{Account, GitService, PassthroughRenewer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use scm::{Login, RepoSlug, StaticSecret, WebhookRequest};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

mod config;
mod telemetry;

use config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "scmctl", version)]
#[command(about = "Query a Gitee instance and verify webhook deliveries")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured REST base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// OAuth or personal access token
    #[arg(long, global = true, env = "GITEE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Login the token belongs to, used in logs
    #[arg(long, global = true, env = "GITEE_LOGIN", default_value = "scmctl")]
    login: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a repository
    Repo { repo: RepoSlug },
    /// List repositories visible to the token
    Repos,
    /// Show the token's permissions on a repository
    Perms { repo: RepoSlug },
    /// List branches
    Branches { repo: RepoSlug },
    /// List tags
    Tags { repo: RepoSlug },
    /// Show one tag
    Tag { repo: RepoSlug, name: String },
    /// Show a commit
    Commit { repo: RepoSlug, reference: String },
    /// Print a file's raw contents
    File {
        repo: RepoSlug,
        path: String,
        #[arg(long = "ref", default_value = "master")]
        reference: String,
    },
    /// List a directory
    Ls {
        repo: RepoSlug,
        #[arg(default_value = "")]
        path: String,
        #[arg(long = "ref", default_value = "master")]
        reference: String,
    },
    /// Show the authenticated user, or another user by login
    User {
        #[arg(value_name = "LOGIN")]
        handle: Option<String>,
    },
    /// Parse and verify a saved webhook delivery body
    Webhook {
        /// Value of the event-type header
        #[arg(long)]
        event: String,
        /// Value of the secret header sent with the delivery
        #[arg(long)]
        delivery_token: Option<String>,
        /// Expected secret. Empty skips verification.
        #[arg(long, default_value = "")]
        secret: String,
        payload: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.gitee.base_url = base_url.clone();
    }
    let telemetry = telemetry::init(&config.telemetry)?;

    let result = run(cli, &config).await;
    if let Err(e) = &result {
        warn!(error = %e, "command failed");
    }
    telemetry.shutdown();
    result
}

async fn run(cli: Cli, config: &CliConfig) -> anyhow::Result<()> {
    let client = gitee::new_client(&config.gitee).context("invalid gitee configuration")?;
    info!(base_url = %config.gitee.base_url, "client ready");

    let account = cli.token.map(|token| Account::new(cli.login, token));
    let account = account.as_ref();
    let service = GitService::new(client.clone(), Arc::new(PassthroughRenewer));

    match cli.command {
        Command::Repo { repo } => print(&service.find_repository(account, &repo).await?),
        Command::Repos => print(&service.list_repositories(account).await?),
        Command::Perms { repo } => print(&service.find_perms(account, &repo).await?),
        Command::Branches { repo } => print(&service.find_branches(account, &repo).await?),
        Command::Tags { repo } => print(&service.find_tags(account, &repo).await?),
        Command::Tag { repo, name } => print(&service.find_tag(account, &repo, &name).await?),
        Command::Commit { repo, reference } => {
            print(&service.find_commit(account, &repo, &reference).await?)
        }
        Command::File {
            repo,
            path,
            reference,
        } => {
            let content = service.find_file(account, &repo, &path, &reference).await?;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&content.data).await?;
            stdout.flush().await?;
            Ok(())
        }
        Command::Ls {
            repo,
            path,
            reference,
        } => print(&service.list_files(account, &repo, &path, &reference).await?),
        Command::User { handle } => {
            let login = handle
                .map(|l| Login::new(l).context("login must not be empty"))
                .transpose()?;
            print(&service.find_user(account, login.as_ref()).await?)
        }
        Command::Webhook {
            event,
            delivery_token,
            secret,
            payload,
        } => {
            let file = tokio::fs::File::open(&payload)
                .await
                .with_context(|| format!("failed to open {}", payload.display()))?;
            let body = gitee::read_body(file).await?;
            let mut request = WebhookRequest::new(body).with_header(gitee::EVENT_HEADER, event);
            if let Some(token) = delivery_token {
                request = request.with_header(gitee::TOKEN_HEADER, token);
            }

            match client.webhooks.parse(&request, &StaticSecret::new(secret)).await {
                Ok(hook) => print(&hook),
                Err(err) => {
                    if let Some(hook) = err.webhook() {
                        warn!(repo = %hook.repository().name, "rejected delivery");
                        print(hook)?;
                    }
                    Err(err.into())
                }
            }
        }
    }
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_file_command() {
        let cli = Cli::try_parse_from([
            "scmctl",
            "--token",
            "abc",
            "file",
            "oars-sigs/drone",
            ".drone.yml",
            "--ref",
            "refs/heads/dev",
        ])
        .unwrap();
        assert_eq!(cli.token.as_deref(), Some("abc"));
        match cli.command {
            Command::File {
                repo,
                path,
                reference,
            } => {
                assert_eq!(repo.as_str(), "oars-sigs/drone");
                assert_eq!(path, ".drone.yml");
                assert_eq!(reference, "refs/heads/dev");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_invalid_slug_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["scmctl", "repo", "no-slash"]).is_err());
    }

    #[test]
    fn test_webhook_command_separates_delivery_token() {
        let cli = Cli::try_parse_from([
            "scmctl",
            "webhook",
            "--event",
            "Push Hook",
            "--delivery-token",
            "abc",
            "--secret",
            "abc",
            "push.json",
        ])
        .unwrap();
        match cli.command {
            Command::Webhook {
                event,
                delivery_token,
                secret,
                payload,
            } => {
                assert_eq!(event, "Push Hook");
                assert_eq!(delivery_token.as_deref(), Some("abc"));
                assert_eq!(secret, "abc");
                assert_eq!(payload, PathBuf::from("push.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "scmctl",
            "tags",
            "oars-sigs/drone",
            "--base-url",
            "http://localhost:8080/",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080/"));
        match cli.command {
            Command::Tags { repo } => assert_eq!(repo.name(), "drone"),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
