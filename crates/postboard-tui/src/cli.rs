use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "postboard", version, about = "Terminal contact-message board")]
pub(crate) struct Cli {
    /// Read settings from this file instead of the default locations.
    #[arg(short = 'c', long = "config")]
    pub(crate) config: Option<PathBuf>,
    /// Storage document; relative paths resolve under the state directory.
    #[arg(short = 's', long = "storage")]
    pub(crate) storage: Option<PathBuf>,
    /// Key under which the messages are kept inside the storage document.
    #[arg(long = "key")]
    pub(crate) key: Option<String>,
    #[arg(long = "theme")]
    pub(crate) theme: Option<String>,
    /// Keep messages in memory only; nothing is read from or written to disk.
    #[arg(long = "memory")]
    pub(crate) memory: bool,
    #[arg(long = "no-mouse")]
    pub(crate) no_mouse: bool,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::Cli;

    #[test]
    fn defaults_leave_config_in_charge() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["postboard"])?;
        assert!(cli.config.is_none());
        assert!(cli.storage.is_none());
        assert!(cli.key.is_none());
        assert!(!cli.memory);
        assert!(!cli.no_mouse);
        Ok(())
    }

    #[test]
    fn flags_are_parsed() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "postboard",
            "-c",
            "/tmp/pb.toml",
            "--storage",
            "board.json",
            "--key",
            "inbox",
            "--theme",
            "nord",
            "--memory",
            "--no-mouse",
        ])?;
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/pb.toml")));
        assert_eq!(cli.storage.as_deref(), Some(Path::new("board.json")));
        assert_eq!(cli.key.as_deref(), Some("inbox"));
        assert_eq!(cli.theme.as_deref(), Some("nord"));
        assert!(cli.memory);
        assert!(cli.no_mouse);
        Ok(())
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["postboard", "--sync"]).is_err());
    }
}
