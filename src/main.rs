//! rook-toolbox CLI - run commands in the Rook/Ceph toolbox pod

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use rook_toolbox::commands;
use rook_toolbox::commands::exec::ExecOptions;
use rook_toolbox::config::Settings;
use rook_toolbox::k8s::Tokenizer;
use rook_toolbox::utils::errors::{display_error_and_exit, enhance_error};
use rook_toolbox::utils::{OutputFormat, logger};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rook-toolbox")]
#[command(author, version, about = "Run commands in the Rook/Ceph toolbox pod", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    /// -v: INFO, -vv: DEBUG, -vvv: TRACE
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (default: .rook-toolbox.toml or ~/.config/rook-toolbox/config.toml)
    #[arg(long, global = true, env = "ROOK_TOOLBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Path to kubeconfig file (default: KUBECONFIG, ~/.kube/config, or in-cluster)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    /// Namespace the toolbox pod runs in
    #[arg(short, long, global = true, env = "ROOK_TOOLBOX_NAMESPACE")]
    namespace: Option<String>,

    /// Label selector for the toolbox pod
    #[arg(short = 'l', long, global = true, env = "ROOK_TOOLBOX_SELECTOR")]
    selector: Option<String>,

    /// Container in the toolbox pod to exec into
    #[arg(short, long, global = true, env = "ROOK_TOOLBOX_CONTAINER")]
    container: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command in the toolbox pod
    Exec {
        /// Stream output as it is produced instead of printing it at the end
        #[arg(long)]
        stream: bool,

        /// Split the command like a POSIX shell (quotes respected)
        #[arg(long)]
        shell_words: bool,

        /// Cancel the command after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Wait up to this many seconds for the toolbox pod to be running
        #[arg(long)]
        wait: Option<u64>,

        /// Command to run, e.g. `ceph osd tree`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Shortcut for `exec ceph status`
    Status {
        /// Cancel the command after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show the pod commands would run in
    Pod {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// List CephCluster resources
    Clusters {
        /// List across all namespaces
        #[arg(short = 'A', long)]
        all_namespaces: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Check cluster access and the toolbox pod
    Check,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write an example config file
    Init {
        /// Where to write it (default: ~/.config/rook-toolbox/config.toml)
        path: Option<PathBuf>,

        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => display_error_and_exit(enhance_error(&e, &Default::default())),
    };

    if let Err(e) = run(cli.command, settings.clone()).await {
        display_error_and_exit(enhance_error(&e, &settings.toolbox));
    }
}

/// Config file first, then flags and env vars on top
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    if cli.kubeconfig.is_some() {
        settings.cluster.kubeconfig = cli.kubeconfig.clone();
    }
    if cli.context.is_some() {
        settings.cluster.context = cli.context.clone();
    }
    settings.toolbox = settings.toolbox.with_overrides(
        cli.namespace.clone(),
        cli.selector.clone(),
        cli.container.clone(),
    );

    Ok(settings)
}

/// `exec` flags on top of the `[exec]` config section
fn apply_exec_flags(
    settings: &mut Settings,
    shell_words: bool,
    timeout: Option<u64>,
    wait: Option<u64>,
) {
    if shell_words {
        settings.exec.tokenizer = Tokenizer::Shell;
    }
    if timeout.is_some() {
        settings.exec.timeout_secs = timeout;
    }
    if wait.is_some() {
        settings.exec.wait_secs = wait;
    }
}

async fn run(command: Commands, mut settings: Settings) -> Result<()> {
    match command {
        Commands::Exec {
            stream,
            shell_words,
            timeout,
            wait,
            command,
        } => {
            apply_exec_flags(&mut settings, shell_words, timeout, wait);
            commands::exec::exec(&settings, ExecOptions { command, stream }).await
        }
        Commands::Status { timeout } => {
            apply_exec_flags(&mut settings, false, timeout, None);
            let command = vec!["ceph".to_string(), "status".to_string()];
            let options = ExecOptions {
                command,
                stream: false,
            };
            commands::exec::exec(&settings, options).await
        }
        Commands::Pod { output } => commands::pod::show_pod(&settings, output).await,
        Commands::Clusters {
            all_namespaces,
            output,
        } => commands::clusters::list_clusters(&settings, all_namespaces, output).await,
        Commands::Check => commands::check::check(&settings).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(&settings),
            ConfigCommands::Init { path, force } => commands::config::init(path, force),
        },
        Commands::Completion { shell } => handle_completion_command(shell),
        Commands::Version => handle_version_command(),
    }
}

fn handle_completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "rook-toolbox", &mut io::stdout());
    Ok(())
}

fn handle_version_command() -> Result<()> {
    println!("rook-toolbox {}", env!("CARGO_PKG_VERSION"));
    println!("Run commands in the Rook/Ceph toolbox pod");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rook_toolbox::k8s::CommandRequest;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exec_collects_trailing_command() {
        let cli = Cli::parse_from([
            "rook-toolbox",
            "-n",
            "storage",
            "exec",
            "--timeout",
            "10",
            "ceph",
            "osd",
            "pool",
            "ls",
            "--format",
            "json",
        ]);

        assert_eq!(cli.namespace.as_deref(), Some("storage"));
        match cli.command {
            Commands::Exec {
                command, timeout, ..
            } => {
                assert_eq!(timeout, Some(10));
                assert_eq!(command, vec!["ceph", "osd", "pool", "ls", "--format", "json"]);
            }
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[toolbox]\nnamespace = \"from-file\"\ncontainer = \"tools\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "rook-toolbox",
            "--config",
            path.to_str().unwrap(),
            "--namespace",
            "from-flag",
            "pod",
        ]);

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.toolbox.namespace, "from-flag");
        assert_eq!(settings.toolbox.container, "tools");
    }

    #[test]
    fn test_shell_words_exec_keeps_quoted_argument() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // What the local shell hands over for: exec --shell-words -- sh -c "ceph df | head -n 3"
        let cli = Cli::parse_from([
            "rook-toolbox",
            "--config",
            path.to_str().unwrap(),
            "exec",
            "--shell-words",
            "--",
            "sh",
            "-c",
            "ceph df | head -n 3",
        ]);

        let mut settings = load_settings(&cli).unwrap();
        let Commands::Exec {
            shell_words,
            timeout,
            wait,
            command,
            stream,
        } = cli.command
        else {
            panic!("expected exec");
        };
        apply_exec_flags(&mut settings, shell_words, timeout, wait);
        let options = ExecOptions { command, stream };

        let line = commands::exec::command_line(&options.command, settings.exec.tokenizer);
        let request = CommandRequest::parse_with(&line, settings.exec.tokenizer).unwrap();
        assert_eq!(settings.exec.tokenizer, Tokenizer::Shell);
        assert_eq!(request.args(), ["sh", "-c", "ceph df | head -n 3"]);
    }
}
