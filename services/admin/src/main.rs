use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod client;
mod error;
mod session;

use crate::{
    client::AdminClient,
    session::{FileSessionStore, SessionStore},
};

#[derive(Parser, Debug)]
#[command(name = "photofolio-admin", about = "Photofolio administration shell")]
struct Cli {
    /// Base URL of the API service
    #[arg(long, env = "PHOTOFOLIO_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Where the login session is kept (default: ~/.photofolio/session.json)
    #[arg(long, env = "PHOTOFOLIO_SESSION")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login {
        username: String,
        #[arg(long, env = "PHOTOFOLIO_PASSWORD")]
        password: String,
    },
    /// Log out and forget the session
    Logout,
    /// Show the logged-in user
    Whoami,
    #[command(subcommand)]
    Users(UserCommand),
    #[command(subcommand)]
    Photos(PhotoCommand),
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    List,
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum PhotoCommand {
    List {
        #[arg(long)]
        category: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session_path = match cli.session_file {
        Some(path) => path,
        None => FileSessionStore::default_path()?,
    };
    let client = AdminClient::new(cli.server, FileSessionStore::new(session_path));

    run(&client, cli.command).await
}

async fn run<S: SessionStore>(client: &AdminClient<S>, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let user = client.login(&username, &password).await?;
            println!("Logged in as {} ({})", user.username, user.role);
        }
        Command::Logout => {
            client.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => {
            let user = client.whoami().await?;
            println!("{} <{}> [{}]", user.username, user.email, user.role);
        }
        Command::Users(UserCommand::List) => {
            for user in client.list_users().await? {
                println!("{:>5}  {:<20} {:<30} {}", user.id, user.username, user.email, user.role);
            }
        }
        Command::Users(UserCommand::Delete { id }) => {
            println!("{}", client.delete_user(id).await?);
        }
        Command::Photos(PhotoCommand::List { category }) => {
            for photo in client.list_photos(category).await? {
                println!(
                    "{:>5}  {:<30} {:<15} {} [{}]",
                    photo.id,
                    photo.title,
                    photo.category_name.as_deref().unwrap_or("-"),
                    photo.file_url,
                    photo.tags.join(", "),
                );
            }
        }
        Command::Categories(CategoryCommand::List) => {
            for category in client.list_categories().await? {
                println!(
                    "{:>5}  {:<20} {}",
                    category.id,
                    category.name,
                    category.description.as_deref().unwrap_or(""),
                );
            }
        }
        Command::Categories(CategoryCommand::Create { name, description }) => {
            let id = client.create_category(&name, description.as_deref()).await?;
            println!("Category created with id {}", id);
        }
        Command::Categories(CategoryCommand::Delete { id }) => {
            println!("{}", client.delete_category(id).await?);
        }
    }

    Ok(())
}
