//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Package every extension with an unpublished version and upload it to the beta channel
#[derive(Parser, Debug)]
#[command(name = "publish-beta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Monorepo root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file, relative to the current directory (defaults to <root>/publish-beta.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Published package record to pin dependencies from, relative to the current directory
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,

    /// Report what would change without writing, installing, packaging or uploading
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary before upload results arrive
    #[arg(long)]
    pub detach_uploads: bool,

    /// Exit with code 2 when any extension failed to patch, package or upload
    #[arg(long)]
    pub strict: bool,

    /// Mirror uploads into a local directory instead of object storage, relative to the current directory
    #[arg(long, value_name = "DIR")]
    pub local_store: Option<PathBuf>,

    /// Storage access key id
    #[arg(long, env = "ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// Storage access key secret
    #[arg(long, env = "ACCESS_KEY_SECRET", hide_env_values = true)]
    pub access_key_secret: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from(["publish-beta"]);
        assert!(!cli.verbose);
        assert!(!cli.dry_run);
        assert!(!cli.strict);
        assert!(cli.root.is_none());
        assert!(cli.local_store.is_none());
    }

    #[test]
    fn parse_run_flags() {
        let cli = Cli::parse_from([
            "publish-beta",
            "--root",
            "repo",
            "--record",
            "record.json",
            "--dry-run",
            "--detach-uploads",
            "--strict",
            "--local-store",
            "out",
            "-v",
        ]);
        assert_eq!(cli.root, Some(PathBuf::from("repo")));
        assert_eq!(cli.record, Some(PathBuf::from("record.json")));
        assert!(cli.dry_run);
        assert!(cli.detach_uploads);
        assert!(cli.strict);
        assert_eq!(cli.local_store, Some(PathBuf::from("out")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_credentials_flags() {
        let cli = Cli::parse_from([
            "publish-beta",
            "--access-key-id",
            "id",
            "--access-key-secret",
            "secret",
        ]);
        assert_eq!(cli.access_key_id.as_deref(), Some("id"));
        assert_eq!(cli.access_key_secret.as_deref(), Some("secret"));
    }
}
