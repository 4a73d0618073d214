use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use coursehub_cli::seeder::{self, SeedConfig};
use coursehub_core::{Capability, hash_password};
use coursehub_models::Email;
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "coursehub-cli")]
#[command(about = "Coursehub CLI - Administrative tools for Coursehub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake courses and users
    Seed {
        /// Number of courses to create
        #[arg(short = 'c', long, default_value = "20")]
        courses: usize,

        /// Number of users to create
        #[arg(short = 'u', long, default_value = "50")]
        users: usize,

        /// Maximum course grants per user
        #[arg(long, default_value = "2")]
        grants: usize,

        /// Videos per course
        #[arg(long, default_value = "4")]
        videos: usize,
    },
    /// Clear all seeded data (keeps accounts not created by the seeder)
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let result = match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed {
            courses,
            users,
            grants,
            videos,
        } => {
            let config = SeedConfig::new(courses)
                .with_users(users)
                .with_grants_per_user(grants)
                .with_videos_per_course(videos);
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    };

    pool.close().await;

    if let Err(e) = result {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Name")
            .interact_text()
            .context("Failed to read name")?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };
    let email = Email::new(&email).map_err(|e| anyhow::anyhow!("{e}"))?;

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    create_admin(pool, name.trim(), &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Email: {}", email);
    println!("   Name: {}", name.trim());
    Ok(())
}

async fn create_admin(db: &PgPool, name: &str, email: &Email, password: &str) -> anyhow::Result<()> {
    if name.is_empty() {
        bail!("Name is required");
    }
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let hashed_password = hash_password(password).map_err(|e| e.error)?;

    let inserted = sqlx::query_scalar::<_, uuid::Uuid>(
        "INSERT INTO users (name, email, password, permissions)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(name)
    .bind(email.as_str())
    .bind(&hashed_password)
    .bind(Capability::to_tags(&[Capability::Admin]))
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    if inserted.is_none() {
        bail!("User with this email already exists");
    }
    Ok(())
}
