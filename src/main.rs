use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// previewkit - preview toolkit for generated UI code
///
/// Detect the packages a generated React/TypeScript snippet depends on,
/// render it to a preview tree inside a bounded sandbox, and keep a
/// simulated install manifest.
///
/// Examples:
///   previewkit detect component.tsx    # List packages the snippet uses
///   previewkit render component.tsx    # Print the rendered preview tree
#[derive(Parser, Debug)]
#[command(author, version = env!("PREVIEWKIT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace root directory (overrides defaults; also via PREVIEWKIT_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "PREVIEWKIT_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,

    /// Extra registry records (JSON array of package records)
    #[arg(long = "registry", value_name = "PATH", global = true)]
    pub registry: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Detect packages used by a snippet
    Detect(SourceArgs),

    /// Render a snippet to a preview tree
    Render(SourceArgs),

    /// Detect packages and install them into the workspace manifest
    Install(SourceArgs),

    /// Remove a package from the workspace manifest
    Uninstall(UninstallArgs),

    /// List packages recorded in the workspace manifest
    List(ListArgs),

    /// Format a snippet
    Fmt(FmtArgs),

    /// Lint a snippet
    Lint(SourceArgs),
}

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// Source file path ('-' reads from stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct UninstallArgs {
    /// Package name as recorded in the manifest
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {}

#[derive(clap::Args, Debug)]
pub struct FmtArgs {
    /// Source file path ('-' reads from stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Rewrite the file in place instead of printing
    #[arg(long)]
    pub write: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = previewkit::runtime::RealRuntime;

    match cli.command {
        Commands::Detect(args) => {
            previewkit::commands::detect(runtime, &args.file, cli.root, cli.registry)
        }
        Commands::Render(args) => previewkit::commands::render(runtime, &args.file),
        Commands::Install(args) => {
            previewkit::commands::install(runtime, &args.file, cli.root, cli.registry)
        }
        Commands::Uninstall(args) => {
            previewkit::commands::uninstall(runtime, &args.name, cli.root)
        }
        Commands::List(_args) => previewkit::commands::list(runtime, cli.root),
        Commands::Fmt(args) => previewkit::commands::fmt(runtime, &args.file, args.write),
        Commands::Lint(args) => previewkit::commands::lint(runtime, &args.file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_detect_parsing() {
        let cli = Cli::try_parse_from(["previewkit", "detect", "component.tsx"]).unwrap();
        match cli.command {
            Commands::Detect(args) => {
                assert_eq!(args.file, PathBuf::from("component.tsx"));
            }
            _ => panic!("Expected Detect command"),
        }
        assert_eq!(cli.root, None);
    }

    #[test]
    fn test_cli_render_stdin_parsing() {
        let cli = Cli::try_parse_from(["previewkit", "render", "-"]).unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.file, PathBuf::from("-"));
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_global_root_parsing() {
        let cli = Cli::try_parse_from(["previewkit", "--root", "/tmp", "list"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_cli_install_with_registry_parsing() {
        let cli = Cli::try_parse_from([
            "previewkit",
            "install",
            "app.tsx",
            "--registry",
            "extra.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.file, PathBuf::from("app.tsx"));
            }
            _ => panic!("Expected Install command"),
        }
        assert_eq!(cli.registry, Some(PathBuf::from("extra.json")));
    }

    #[test]
    fn test_cli_fmt_write_flag() {
        let cli = Cli::try_parse_from(["previewkit", "fmt", "app.tsx", "--write"]).unwrap();
        match cli.command {
            Commands::Fmt(args) => {
                assert!(args.write);
            }
            _ => panic!("Expected Fmt command"),
        }
    }

    #[test]
    fn test_cli_uninstall_parsing() {
        let cli = Cli::try_parse_from(["previewkit", "uninstall", "axios"]).unwrap();
        match cli.command {
            Commands::Uninstall(args) => {
                assert_eq!(args.name, "axios");
            }
            _ => panic!("Expected Uninstall command"),
        }
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["previewkit", "component.tsx"]);
        assert!(result.is_err());
    }
}
