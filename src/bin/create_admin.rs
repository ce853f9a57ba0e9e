//! Admin seeding tool.
//!
//! Inserts an admin account with a bcrypt-hashed password so that the
//! login endpoint has someone to authenticate. There is no signup route
//! on purpose; accounts are provisioned out of band with this binary.
//!
//! Usage:
//!     cargo run --bin create_admin -- <email> <password>

use curriculum_portal::repository::{PostgresRepository, Repository};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (email, password) = match (args.next(), args.next()) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            eprintln!("Usage: create_admin <email> <password>");
            std::process::exit(1);
        }
    };

    let db_url = std::env::var("DATABASE_URL")
        .expect("FATAL: DATABASE_URL must be set to create an admin.");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let password_hash =
        bcrypt::hash(&password, bcrypt::DEFAULT_COST).expect("FATAL: Failed to hash password.");

    let repo = PostgresRepository::new(pool);
    let admin = repo
        .create_admin(&email, &password_hash)
        .await
        .expect("FATAL: Failed to insert admin (is the email already taken?)");

    println!("Admin created: {} ({})", admin.email, admin.id);
}
