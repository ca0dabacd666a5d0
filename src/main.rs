use anyhow::Result;
use clap::{Parser, Subcommand};

use userdir::cli::{handle_log_command, handle_user_command, LogCommands, UserCommands};
use userdir::config::{paths::UserDirPaths, settings::Settings};
use userdir::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "userdir",
    version,
    about = "User directory maintenance with an audited change history",
    long_about = "userdir keeps a small directory of users and records every \
                  creation and edit in an append-only change log, with the \
                  user's state before and after each change."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Change log commands
    #[command(subcommand)]
    Log(LogCommands),

    /// Initialize the directory with the default users
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = UserDirPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    userdir::logging::init(&settings.log_level);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Log(cmd)) => {
            handle_log_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing userdir at: {}", paths.base_dir().display());
            let seeded = initialize_storage(&paths, &storage.users)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if seeded > 0 {
                println!("{} default users have been created.", seeded);
            } else {
                println!("Existing users were left untouched.");
            }
            println!();
            println!("Run 'userdir user list' to see all users.");
        }
        Some(Commands::Config) => {
            println!("userdir Configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("User table:     {}", paths.users_file().display());
            println!("Change log:     {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Date format:      {}", settings.date_format);
            println!("  Timestamp format: {}", settings.timestamp_format);
            println!("  Log level:        {}", settings.log_level);
            println!("  Log list limit:   {}", settings.audit_list_limit);
        }
        None => {
            println!("userdir - user directory with an audited change history");
            println!();
            println!("Run 'userdir --help' for usage information.");
        }
    }

    Ok(())
}
