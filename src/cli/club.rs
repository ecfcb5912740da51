use anyhow::Result;

use crate::clubs::{User, add_member, create_club};
use crate::core::db::async_db;

pub async fn create(name: &str, db_path: &str) -> Result<()> {
    let db = async_db(db_path).await?;
    let club = create_club(&db, name).await?;
    println!("Created club {} ({})", club.name, club.id);
    Ok(())
}

pub async fn add(
    club_id: &str,
    user_id: &str,
    name: Option<String>,
    email: Option<String>,
    db_path: &str,
) -> Result<()> {
    let db = async_db(db_path).await?;
    let user = User {
        id: user_id.to_string(),
        name,
        email,
    };
    add_member(&db, club_id, user).await?;
    println!("Added {} to club {}", user_id, club_id);
    Ok(())
}
