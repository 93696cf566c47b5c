use std::str::FromStr;

use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::Flashcard;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        Self::connect(&config.sqlite_dsn()).await
    }

    pub async fn connect(dsn: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(dsn)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS flashcards (
                id TEXT PRIMARY KEY,
                front TEXT NOT NULL,
                back TEXT NOT NULL,
                category TEXT NOT NULL,
                links TEXT NOT NULL,
                interval REAL NOT NULL,
                ease REAL NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Assigns ids and inserts the whole batch in one transaction; a failure
    /// rolls back every card so no partial batch is ever visible.
    pub async fn save_cards(&self, cards: &[Flashcard]) -> Result<Vec<Flashcard>> {
        let mut stored = Vec::with_capacity(cards.len());
        let mut tx = self.pool.begin().await?;

        for card in cards {
            let mut card = card.clone();
            card.id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO flashcards (id, front, back, category, links, interval, ease, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&card.id)
            .bind(&card.front)
            .bind(&card.back)
            .bind(&card.category)
            .bind(serde_json::to_string(&card.links)?)
            .bind(card.interval)
            .bind(card.ease)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;

            stored.push(card);
        }

        tx.commit().await?;
        Ok(stored)
    }

    pub async fn list_cards(&self, category: Option<&str>) -> Result<Vec<Flashcard>> {
        let rows: Vec<SqliteRow> = match category {
            Some(category) => {
                sqlx::query(
                    r#"
                    SELECT id, front, back, category, links, interval, ease
                    FROM flashcards
                    WHERE category = ?
                    ORDER BY rowid ASC
                    "#,
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, front, back, category, links, interval, ease
                    FROM flashcards
                    ORDER BY rowid ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(row_to_card).collect())
    }

    pub async fn get_card(&self, card_id: &str) -> Result<Option<Flashcard>> {
        let row = sqlx::query(
            r#"
            SELECT id, front, back, category, links, interval, ease
            FROM flashcards
            WHERE id = ?
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_card))
    }

    pub async fn update_review(&self, card_id: &str, interval: f64, ease: f64) -> Result<()> {
        sqlx::query("UPDATE flashcards SET interval = ?, ease = ? WHERE id = ?")
            .bind(interval)
            .bind(ease)
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn row_to_card(row: SqliteRow) -> Flashcard {
    let links: Vec<String> =
        serde_json::from_str(&row.get::<String, _>("links")).unwrap_or_default();
    Flashcard {
        id: row.get("id"),
        front: row.get("front"),
        back: row.get("back"),
        category: row.get("category"),
        links,
        interval: row.get("interval"),
        ease: row.get("ease"),
    }
}
