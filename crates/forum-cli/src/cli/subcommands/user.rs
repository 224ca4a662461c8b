use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Option<String>,
    },
    /// Get a user by ID, or by `--email`.
    Get {
        #[arg(required_unless_present = "email")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        email: Option<String>,
    },
    /// Change the acting user's name and/or role.
    #[command(arg_required_else_help = true)]
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Show the acting user's profile.
    Me,
}
