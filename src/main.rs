use article_api::db::services::ExtraFields;
use article_api::server::{self, config::ServerConfig, logging, BoxError};
use article_api::services::validation;
use article_api::version::VERSION;
use article_api::web::error::{AppError, FieldErrors};

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create an account with staff and superuser rights
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();

    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    logging::init_logging(&server_config.log_dir);
    info!("Starting article-api, version: {}", VERSION);

    let db_pool = server::prepare_database(&server_config).await.map_err(|e| {
        error!(error = %e, "Failed to prepare the database.");
        e
    })?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => server::serve(server_config, db_pool).await,
        Command::CreateSuperuser { email, password, name } => {
            let mut errors = FieldErrors::new();
            validation::validate_email(&mut errors, "email", &email);
            validation::validate_password(&mut errors, "password", &password);
            validation::validate_name(&mut errors, "name", &name);
            if !errors.is_empty() {
                error!(%errors, "Superuser creation rejected.");
                return Err(errors.to_string().into());
            }

            let state = article_api::web::AppState::new(db_pool, server_config)?;
            match state
                .users
                .create_superuser(Some(&email), Some(&password), ExtraFields::named(name))
                .await
            {
                Ok(user) => {
                    info!(user_id = user.id, "Superuser created.");
                    println!("Superuser {} created.", user.email);
                    Ok(())
                }
                Err(AppError::Validation(errors)) => {
                    error!(%errors, "Superuser creation rejected.");
                    Err(errors.to_string().into())
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
