use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;

pub mod club;
pub mod connect;
pub mod init;
pub mod serve;
pub mod suggest;

#[derive(Subcommand)]
enum Command {
    /// Create the database schema
    Init {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "3000")]
        port: String,
    },
    /// Create a new club and print its id
    CreateClub {
        #[arg(long)]
        name: String,
    },
    /// Add a user to a club
    AddMember {
        #[arg(long)]
        club_id: String,
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Store a Google Calendar refresh token for a user
    Connect {
        #[arg(long)]
        user_id: String,
    },
    /// Print suggested meeting times for a club
    Suggest {
        #[arg(long)]
        club_id: String,
        /// Start of the search window (RFC 3339)
        #[arg(long)]
        time_min: String,
        /// End of the search window (RFC 3339)
        #[arg(long)]
        time_max: String,
        #[arg(long)]
        duration_minutes: Option<String>,
        /// Earliest local start time as HH:mm
        #[arg(long)]
        start_time_of_day: Option<String>,
        /// Latest local end time as HH:mm
        #[arg(long)]
        end_time_of_day: Option<String>,
        /// Minutes to add to local time to get UTC, e.g. 420 for PDT
        #[arg(long, allow_hyphen_values = true)]
        offset_minutes: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    let storage_path = env::var("WN_STORAGE_PATH").unwrap_or("./".to_string());
    let db_path = format!("{}/db", storage_path);

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&db_path).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::CreateClub { name }) => {
            club::create(&name, &db_path).await?;
        }
        Some(Command::AddMember {
            club_id,
            user_id,
            name,
            email,
        }) => {
            club::add(&club_id, &user_id, name, email, &db_path).await?;
        }
        Some(Command::Connect { user_id }) => {
            connect::run(&user_id, &db_path).await?;
        }
        Some(Command::Suggest {
            club_id,
            time_min,
            time_max,
            duration_minutes,
            start_time_of_day,
            end_time_of_day,
            offset_minutes,
        }) => {
            suggest::run(suggest::SuggestArgs {
                club_id,
                time_min,
                time_max,
                duration_minutes,
                start_time_of_day,
                end_time_of_day,
                offset_minutes,
            })
            .await?;
        }
        None => {}
    }

    Ok(())
}
