use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use blackcoffee_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_admin(&pool, "admin@coffeestore.com", "Admin123!").await?;
    let user_id = ensure_user(&pool, "user@coffeestore.com", "User1234!").await?;
    seed_products(&pool).await?;
    seed_news(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    ensure_user_with_role(pool, email, password, "admin").await
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    ensure_user_with_role(pool, email, password, "user").await
}

async fn ensure_user_with_role(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, role, email_verified)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(email.split('@').next().unwrap_or("user"))
    .bind(role)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM products")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        println!("Products already seeded, skipping");
        return Ok(());
    }

    let samples = [
        (
            ("Арабіка Колумбія Супремо", "Arabica Colombia Supremo"),
            ("Збалансований смак з нотами карамелі", "Balanced taste with caramel notes"),
            350_i64,
            Some(420_i64),
            ("Арабіка", "Arabica"),
            ("Зерна", "Beans"),
            ("250г", "250g"),
            ("Колумбія", "Colombia"),
            false,
            true,
        ),
        (
            ("Ефіопія Їргачеф", "Ethiopia Yirgacheffe"),
            ("Яскрава кислотність та квіткові ноти", "Bright acidity and floral notes"),
            390,
            None,
            ("Арабіка", "Arabica"),
            ("Зерна", "Beans"),
            ("250г", "250g"),
            ("Ефіопія", "Ethiopia"),
            true,
            false,
        ),
        (
            ("Міцний купаж еспресо", "Strong Espresso Blend"),
            ("Щільне тіло та шоколадне післясмак", "Dense body and chocolate aftertaste"),
            280,
            None,
            ("Купажі", "Blends"),
            ("Мелена", "Ground"),
            ("500г", "500g"),
            ("Бразилія / В'єтнам", "Brazil / Vietnam"),
            false,
            false,
        ),
    ];

    for (name, description, price, original_price, category, kind, weight, origin, is_new, is_on_sale) in
        samples
    {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price, original_price, image, category, product_type,
                 weight, origin, is_new, is_on_sale, in_stock)
            VALUES ($1, $2, $3, $4, $5, '', $6, $7, $8, $9, $10, $11, TRUE)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(serde_json::json!({ "uk": name.0, "en": name.1 }))
        .bind(serde_json::json!({ "uk": description.0, "en": description.1 }))
        .bind(price)
        .bind(original_price)
        .bind(serde_json::json!({ "uk": category.0, "en": category.1 }))
        .bind(serde_json::json!({ "uk": kind.0, "en": kind.1 }))
        .bind(serde_json::json!({ "uk": weight.0, "en": weight.1 }))
        .bind(serde_json::json!({ "uk": origin.0, "en": origin.1 }))
        .bind(is_new)
        .bind(is_on_sale)
        .execute(pool)
        .await?;
    }

    println!("Seeded {} products", samples.len());
    Ok(())
}

async fn seed_news(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM news")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        println!("News already seeded, skipping");
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO news (id, title, excerpt, content, author, image, category, featured, read_time)
        VALUES ($1, $2, $3, $4, $5, '', 'company', TRUE, 1)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(serde_json::json!({ "uk": "Відкриття нового обсмажувального цеху", "en": "New roastery opening" }))
    .bind(serde_json::json!({ "uk": "Ми розширюємо виробництво", "en": "We are expanding production" }))
    .bind(serde_json::json!({ "uk": "Детальна розповідь про новий цех та обладнання.", "en": "The full story about the new roastery and equipment." }))
    .bind("CoffeeStore")
    .execute(pool)
    .await?;

    println!("Seeded news");
    Ok(())
}
