//! Seeds the database with the demo catalog: six categories, eleven
//! products, and two customers. Safe to re-run; existing rows are matched
//! by name (products are refreshed, customers left alone).
//!
//! Usage:
//! ```bash
//! cargo run --bin seed
//! ```

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: f64,
    stock_quantity: i32,
}

const CATEGORIES: &[(&str, &str, &[SeedProduct])] = &[
    (
        "Fruits",
        "Fresh and juicy fruits",
        &[
            SeedProduct { name: "Organic Apples", description: "Crisp Fuji variety, sold per piece", price: 0.75, stock_quantity: 150 },
            SeedProduct { name: "Bananas", description: "Bunch of 5, ripe", price: 1.99, stock_quantity: 200 },
            SeedProduct { name: "Blueberries", description: "Fresh organic blueberries, 1 pint", price: 4.99, stock_quantity: 60 },
        ],
    ),
    (
        "Vegetables",
        "Farm fresh vegetables",
        &[
            SeedProduct { name: "Carrots", description: "1lb bag, organic", price: 1.29, stock_quantity: 100 },
            SeedProduct { name: "Broccoli", description: "Fresh crown, approx 1lb", price: 2.49, stock_quantity: 75 },
        ],
    ),
    (
        "Dairy",
        "Milk, cheese, yogurt, etc.",
        &[
            SeedProduct { name: "Whole Milk", description: "1 Gallon, Vitamin D", price: 3.99, stock_quantity: 50 },
            SeedProduct { name: "Cheddar Cheese", description: "8oz block, sharp", price: 4.79, stock_quantity: 40 },
        ],
    ),
    (
        "Bakery",
        "Freshly baked goods",
        &[
            SeedProduct { name: "Sourdough Bread", description: "Artisan loaf, unsliced", price: 5.50, stock_quantity: 30 },
        ],
    ),
    (
        "Beverages",
        "Drinks and refreshments",
        &[
            SeedProduct { name: "Orange Juice", description: "Not from concentrate, 52 fl oz", price: 4.25, stock_quantity: 80 },
        ],
    ),
    (
        "Snacks",
        "Chips, nuts, and other munchies",
        &[
            SeedProduct { name: "Potato Chips", description: "Classic salted, 9oz bag", price: 3.19, stock_quantity: 120 },
            SeedProduct { name: "Almonds", description: "Roasted, unsalted, 1lb bag", price: 7.99, stock_quantity: 60 },
        ],
    ),
];

const CUSTOMERS: &[(&str, &str, &str, &str, &str)] = &[
    ("John", "Doe", "john.doe@example.com", "555-0101", "123 Main St, Anytown"),
    ("Jane", "Smith", "jane.smith@example.com", "555-0102", "456 Oak Ave, Anytown"),
];

#[tokio::main]
async fn main() -> Result<(), sqlx::Error> {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    for &(name, description, products) in CATEGORIES {
        let category_id = get_or_create_category(&pool, name, description).await?;
        for product in products {
            upsert_product(&pool, category_id, product).await?;
        }
        info!(category = name, products = products.len(), "Seeded category");
    }

    for &(first_name, last_name, email, phone, address) in CUSTOMERS {
        sqlx::query(
            "INSERT INTO customers (first_name, last_name, email, phone_number, address)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .execute(&pool)
        .await?;
    }
    info!(customers = CUSTOMERS.len(), "Seeded customers");

    info!("Seeding completed");
    Ok(())
}

async fn get_or_create_category(
    pool: &PgPool,
    name: &str,
    description: &str,
) -> Result<i64, sqlx::Error> {
    if let Some(id) = sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?
    {
        return Ok(id);
    }

    sqlx::query_scalar("INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await
}

async fn upsert_product(
    pool: &PgPool,
    category_id: i64,
    product: &SeedProduct,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products (name, description, category_id, price, stock_quantity)
         VALUES ($1, $2, $3, $4::FLOAT8, $5)
         ON CONFLICT (name) DO UPDATE SET
            description = EXCLUDED.description,
            category_id = EXCLUDED.category_id,
            price = EXCLUDED.price,
            stock_quantity = EXCLUDED.stock_quantity",
    )
    .bind(product.name)
    .bind(product.description)
    .bind(category_id)
    .bind(product.price)
    .bind(product.stock_quantity)
    .execute(pool)
    .await?;

    Ok(())
}
