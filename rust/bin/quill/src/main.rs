//! `quill`: terminal front-end for the Quill blog client.
//!
//! Every command drives the same request handlers a UI would, then prints
//! the resulting page state and notifications.

mod commands;
mod output;

use clap::{Parser, Subcommand};

use commands::Shell;

/// Quill CLI tool.
#[derive(Parser, Debug)]
#[command(name = "quill", about = "Quill blog client")]
struct Cli {
    /// Path to client config file (default: ~/.quill/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Login and store tokens locally.
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when absent).
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget stored tokens.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// List posts.
    Posts {
        #[arg(long)]
        search: Option<String>,
        /// created_at, -created_at, updated_at or -updated_at.
        #[arg(long)]
        ordering: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        title: Option<String>,
        /// Author username; repeatable.
        #[arg(long = "author")]
        authors: Vec<String>,
        /// Tag text; repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Created on or after (YYYY-MM-DD).
        #[arg(long)]
        after: Option<String>,
        /// Created on or before (YYYY-MM-DD).
        #[arg(long)]
        before: Option<String>,
    },

    /// Posts from followed users.
    Feed {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        ordering: Option<String>,
        /// Number of pages to load.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Single post operations.
    Post {
        #[command(subcommand)]
        action: PostAction,
    },

    /// Comment on a post or delete a comment.
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Mark a post as favourite.
    Favourite {
        slug: String,
        /// Remove from favourites instead.
        #[arg(long)]
        undo: bool,
    },

    /// List profiles.
    Profiles {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show a profile with followers, followed users and posts.
    Profile { username: String },

    /// Follow a user.
    Follow {
        username: String,
        /// Unfollow instead.
        #[arg(long)]
        undo: bool,
    },

    /// Search tags.
    Tags {
        #[arg(default_value = "")]
        query: String,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum PostAction {
    /// Show a post and its comments.
    Show {
        slug: String,
        /// Oldest comments first.
        #[arg(long)]
        oldest: bool,
    },
    /// Create a post.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        body: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Replace a post's body.
    Edit {
        slug: String,
        #[arg(long)]
        body: String,
    },
    /// Delete a post.
    Delete {
        slug: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CommentAction {
    Add { slug: String, body: String },
    Delete {
        slug: String,
        id: u64,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Commands::Version = cli.command {
        println!("quill cli v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(quill_app::ClientConfig::default_path);
    let json = cli.output == "json";
    let shell = Shell::open(&config_path, json).await?;

    match cli.command {
        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => prompt("Email: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            commands::auth::login(&shell, &email, &password).await?;
        }

        Commands::Register {
            email,
            username,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => {
                    let pw = rpassword::prompt_password("Password: ")?;
                    let confirm = rpassword::prompt_password("Confirm password: ")?;
                    if pw != confirm {
                        anyhow::bail!("Passwords do not match.");
                    }
                    pw
                }
            };
            if password.is_empty() {
                anyhow::bail!("Password cannot be empty.");
            }
            commands::auth::register(&shell, &email, &username, &password).await?;
        }

        Commands::Logout => commands::auth::logout(&shell).await?,

        Commands::Whoami => commands::auth::whoami(&shell)?,

        Commands::Posts {
            search,
            ordering,
            page,
            page_size,
            title,
            authors,
            tags,
            after,
            before,
        } => {
            let query = commands::posts::ListQuery {
                search,
                ordering,
                page,
                page_size,
                title,
                authors,
                tags,
                after,
                before,
            };
            commands::posts::list(&shell, query).await?;
        }

        Commands::Feed {
            search,
            ordering,
            pages,
        } => {
            commands::posts::feed(&shell, search, ordering, pages).await?;
        }

        Commands::Post { action } => match action {
            PostAction::Show { slug, oldest } => {
                commands::post::show(&shell, &slug, oldest).await?;
            }
            PostAction::Create {
                title,
                description,
                body,
                tags,
            } => {
                commands::post::create(&shell, title, description, body, tags).await?;
            }
            PostAction::Edit { slug, body } => {
                commands::post::edit(&shell, &slug, body).await?;
            }
            PostAction::Delete { slug, yes } => {
                if !yes && !confirm()? {
                    println!("Cancelled.");
                    return Ok(());
                }
                commands::post::delete(&shell, &slug).await?;
            }
        },

        Commands::Comment { action } => match action {
            CommentAction::Add { slug, body } => {
                commands::post::comment(&shell, &slug, body).await?;
            }
            CommentAction::Delete { slug, id, yes } => {
                if !yes && !confirm()? {
                    println!("Cancelled.");
                    return Ok(());
                }
                commands::post::delete_comment(&shell, &slug, id).await?;
            }
        },

        Commands::Favourite { slug, undo } => {
            commands::post::favourite(&shell, &slug, !undo).await?;
        }

        Commands::Profiles {
            search,
            page,
            page_size,
        } => {
            commands::profiles::list(&shell, search, page, page_size).await?;
        }

        Commands::Profile { username } => {
            commands::profiles::show(&shell, &username).await?;
        }

        Commands::Follow { username, undo } => {
            commands::profiles::follow(&shell, &username, !undo).await?;
        }

        Commands::Tags { query } => commands::posts::tags(&shell, &query).await?,

        Commands::Version => {}
    }

    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}");
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn confirm() -> anyhow::Result<bool> {
    Ok(prompt("Are you sure? [y/N]: ")?.eq_ignore_ascii_case("y"))
}
