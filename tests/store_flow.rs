use blackcoffee_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        cart::SaveCartRequest,
        orders::CreateOrderRequest,
    },
    error::AppError,
    middleware::auth::{AuthUser, ensure_admin},
    models::{CartLine, OrderStatus},
    services::{admin_service, auth_service, cart_service, order_service},
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

// Integration flow: register -> login -> cart -> order, plus the admin
// stats role check. Skipped when no database is configured.
#[tokio::test]
async fn register_login_cart_and_order_flow() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };
    // SAFETY: test-only env mutation before any token is issued.
    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };

    let state = setup_state(&database_url).await?;

    // Weak password is rejected and nothing is persisted.
    let weak = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "weak@example.com".into(),
            password: "short".into(),
            name: "Weak".into(),
        },
    )
    .await;
    assert!(matches!(weak, Err(AppError::BadRequest(_))));
    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM users WHERE email = $1")
        .bind("weak@example.com")
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(count.0, 0);

    // Register and login round trip.
    let registered = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "buyer@example.com".into(),
            password: "S3cure!pass".into(),
            name: "Buyer".into(),
        },
    )
    .await?;
    let user = registered.data.expect("registered user");

    let duplicate = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "buyer@example.com".into(),
            password: "S3cure!pass".into(),
            name: "Buyer".into(),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "buyer@example.com".into(),
            password: "S3cure!pass".into(),
        },
    )
    .await?;
    let login = login.data.expect("login payload");
    assert!(!login.token.is_empty());
    assert_eq!(login.user.email, "buyer@example.com");

    let bad_login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "buyer@example.com".into(),
            password: "wrong-password".into(),
        },
    )
    .await;
    assert!(matches!(bad_login, Err(AppError::Unauthorized(_))));

    let auth_user = AuthUser {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role.clone(),
    };

    // Same product twice collapses to one line with quantity 2.
    let product_id = Uuid::new_v4().to_string();
    let line = CartLine {
        id: product_id.clone(),
        name: "Арабіка Колумбія".into(),
        price: 100,
        image: String::new(),
        quantity: 2,
        item_type: "beans".into(),
        weight: "250г".into(),
    };
    cart_service::save_cart(
        &state,
        &auth_user,
        SaveCartRequest {
            items: vec![line.clone()],
        },
    )
    .await?;

    let cart = cart_service::get_cart(&state, &auth_user).await?;
    let items = cart.data.expect("cart contents").items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    let total: i64 = items.iter().map(|i| i.price * i.quantity).sum();
    assert_eq!(total, 200);

    // Order creation rejects empty items and a zero total.
    let empty = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            items: vec![],
            total: 200,
            delivery_address: None,
            payment_method: None,
        },
    )
    .await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    let no_total = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            items: vec![line.clone()],
            total: 0,
            delivery_address: None,
            payment_method: None,
        },
    )
    .await;
    assert!(matches!(no_total, Err(AppError::BadRequest(_))));

    let created = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            items,
            total,
            delivery_address: Some("Київ, вул. Хрещатик 1".into()),
            payment_method: Some("card".into()),
        },
    )
    .await?;
    let created = created.data.expect("created order");
    assert!(created.order_number.starts_with("ORD-"));

    let orders = order_service::list_orders(&state, &auth_user, Default::default()).await?;
    let orders = orders.data.expect("order list").items;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total, 200);
    assert_eq!(orders[0].status, OrderStatus::Pending);

    // Admin surface: a plain user is forbidden, an admin gets the stats.
    assert!(matches!(
        ensure_admin(&auth_user),
        Err(AppError::Forbidden)
    ));
    let stats = admin_service::stats(&state, &auth_user).await;
    assert!(matches!(stats, Err(AppError::Forbidden)));

    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        email: "admin@example.com".into(),
        role: "admin".into(),
    };
    let stats = admin_service::stats(&state, &admin).await?;
    let stats = stats.data.expect("stats payload");
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_revenue, 200);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE image_chunks, image_files, admin_logs, notifications, favorites, orders, carts, news, products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        public_base_url: "http://localhost:3000".to_string(),
        mailer: None,
        image_host: None,
    })
}
