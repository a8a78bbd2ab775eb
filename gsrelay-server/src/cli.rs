/// Parsed command-line arguments.
pub struct CliArgs {
    /// Configuration files, in the order given. Later files override earlier
    /// ones.
    pub config_files: Vec<String>,
    /// Whether help was requested.
    pub help_requested: bool,
}

impl CliArgs {
    /// Parse command-line arguments.
    ///
    /// Supported flags:
    /// - `--config-file <path>` / `--config-file=<path>` / `-c <path>`:
    ///   configuration file, repeatable
    /// - `--help` or `-h`: print help and exit
    pub fn parse() -> Self {
        Self::from_args(&std::env::args().collect::<Vec<_>>())
    }

    fn from_args(args: &[String]) -> Self {
        let help_requested = args.iter().any(|a| a == "--help" || a == "-h");

        let mut config_files = Vec::new();
        let mut i = 1usize;
        while i < args.len() {
            let a = &args[i];
            if let Some(stripped) = a.strip_prefix("--config-file=") {
                config_files.push(stripped.to_string());
            } else if let Some(stripped) = a.strip_prefix("-c=") {
                config_files.push(stripped.to_string());
            } else if (a == "--config-file" || a == "-c") && i + 1 < args.len() {
                config_files.push(args[i + 1].clone());
                i += 1;
            }
            i += 1;
        }

        Self {
            config_files,
            help_requested,
        }
    }

    /// Print usage information to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage: gsrelay [--config-file PATH]... [--help]\n\n\
             --config-file, -c    Configuration file; repeatable, later files\n\
                                  override earlier ones (falls back to the\n\
                                  GSRELAY_CONFIG_PATH env var)\n\
             --help, -h           Display this help"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("gsrelay")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn collects_repeated_config_files_in_order() {
        let parsed = CliArgs::from_args(&args(&[
            "--config-file",
            "base.toml",
            "-c",
            "site.toml",
            "--config-file=local.toml",
        ]));
        assert_eq!(parsed.config_files, vec!["base.toml", "site.toml", "local.toml"]);
        assert!(!parsed.help_requested);
    }

    #[test]
    fn detects_help() {
        assert!(CliArgs::from_args(&args(&["-h"])).help_requested);
        assert!(CliArgs::from_args(&args(&["--help"])).help_requested);
        assert!(!CliArgs::from_args(&args(&[])).help_requested);
    }

    #[test]
    fn dangling_flag_is_ignored() {
        let parsed = CliArgs::from_args(&args(&["--config-file"]));
        assert!(parsed.config_files.is_empty());
    }
}
