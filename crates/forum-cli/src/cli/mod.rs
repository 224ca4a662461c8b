use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `forum` binary.
#[derive(Debug, Parser)]
#[command(name = "forum", version, about = "Forum backend - questions, answers, votes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides `database.path`)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Act as this user (overrides `auth.user_id`)
    #[arg(long = "as", global = true, value_name = "USER_ID")]
    pub as_user: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
            as_user: self.as_user.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use forum_core::enums::{ListSort, TargetKind};
    use pretty_assertions::assert_eq;

    use super::subcommands::{AnswerCommands, QuestionCommands, UserCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "forum",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "question",
            "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Question {
                action: QuestionCommands::List { .. }
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "forum", "question", "get", "qst-1", "--format", "raw", "--quiet",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["forum", "--format", "xml", "question", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn vote_accepts_negative_polarity() {
        let cli = Cli::try_parse_from(["forum", "--as", "usr-1", "answer", "vote", "ans-1", "-1"])
            .expect("cli should parse");

        match cli.command {
            Commands::Answer {
                action: AnswerCommands::Vote { id, polarity },
            } => {
                assert_eq!(id, "ans-1");
                assert_eq!(polarity, -1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.as_user.as_deref(), Some("usr-1"));
    }

    #[test]
    fn vote_passes_out_of_range_polarity_through() {
        let cli = Cli::try_parse_from(["forum", "question", "vote", "qst-1", "3"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Question {
                action: QuestionCommands::Vote { polarity: 3, .. }
            }
        ));
    }

    #[test]
    fn list_sort_parses_and_falls_back() {
        let cli = Cli::try_parse_from(["forum", "question", "list", "--sort", "upvotes"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Question {
                action: QuestionCommands::List {
                    sort: ListSort::Score,
                    ..
                }
            }
        ));

        let cli = Cli::try_parse_from(["forum", "question", "list", "--sort", "hot"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Question {
                action: QuestionCommands::List {
                    sort: ListSort::Latest,
                    ..
                }
            }
        ));
    }

    #[test]
    fn user_update_and_me_parse() {
        let cli = Cli::try_parse_from([
            "forum", "--as", "usr-1", "user", "update", "--role", "admin",
        ])
        .expect("cli should parse");
        assert_eq!(cli.as_user.as_deref(), Some("usr-1"));
        match cli.command {
            Commands::User {
                action: UserCommands::Update { name, role },
            } => {
                assert_eq!(name, None);
                assert_eq!(role.as_deref(), Some("admin"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["forum", "user", "me"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::User {
                action: UserCommands::Me
            }
        ));

        assert!(Cli::try_parse_from(["forum", "user", "update"]).is_err());
    }

    #[test]
    fn verify_parses_target_kind() {
        let cli =
            Cli::try_parse_from(["forum", "verify", "answer", "ans-1"]).expect("cli should parse");
        match cli.command {
            Commands::Verify(args) => {
                assert_eq!(args.kind, TargetKind::Answer);
                assert_eq!(args.id, "ans-1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["forum", "verify", "comment", "c-1"]).is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["forum", "--db", "/tmp/forum.db", "question", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some("/tmp/forum.db"));
        assert_eq!(flags.as_user, None);
    }
}
