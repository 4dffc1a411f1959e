use std::future::Future;

use log::{debug, error, info};
use sqlx::{Pool, QueryBuilder, Sqlite, query_builder::Separated};

use crate::{
    BatchError,
    customer::{record::Customer, repository::CustomerRepository},
    item::rdbc::DatabaseItemBinder,
};

/// Default table holding the customers.
pub const CUSTOMERS_TABLE: &str = "customers";

const CUSTOMER_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "surname",
    "email",
    "age",
    "location",
    "country_code",
];

/// Binds a [`Customer`] in the order of the `customers` columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct CustomerBinder;

impl DatabaseItemBinder<Customer, Sqlite> for CustomerBinder {
    fn bind(&self, item: &Customer, mut query_builder: Separated<Sqlite, &str>) {
        query_builder.push_bind(item.id);
        query_builder.push_bind(item.name.clone());
        query_builder.push_bind(item.surname.clone());
        query_builder.push_bind(item.email.clone());
        query_builder.push_bind(item.age);
        query_builder.push_bind(item.location.clone());
        query_builder.push_bind(item.country_code.clone());
    }
}

/// Customer repository backed by a SQLite pool.
///
/// The repository methods are synchronous like the rest of the batch
/// pipeline. Each call blocks on the current Tokio runtime through
/// [`tokio::task::block_in_place`], so it must run on a multi-threaded
/// runtime.
///
/// # Examples
///
/// ```no_run
/// use customer_batch::item::rdbc::SqliteCustomerRepository;
/// use customer_batch::customer::repository::CustomerRepository;
/// use sqlx::SqlitePool;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = SqlitePool::connect("sqlite://customers.db").await?;
/// let repository = SqliteCustomerRepository::new(&pool);
/// repository.create_table_if_missing().await?;
///
/// assert!(!repository.exists(42)?);
/// # Ok(())
/// # }
/// ```
pub struct SqliteCustomerRepository<'a> {
    pool: &'a Pool<Sqlite>,
    table: &'a str,
    binder: CustomerBinder,
}

impl<'a> SqliteCustomerRepository<'a> {
    pub fn new(pool: &'a Pool<Sqlite>) -> Self {
        Self {
            pool,
            table: CUSTOMERS_TABLE,
            binder: CustomerBinder,
        }
    }

    /// Uses `table` instead of [`CUSTOMERS_TABLE`].
    ///
    /// The name is put into the statements as is; it must be a trusted
    /// identifier.
    pub fn table(mut self, table: &'a str) -> Self {
        self.table = table;
        self
    }

    /// Creates the customer table unless it already exists.
    pub async fn create_table_if_missing(&self) -> Result<(), BatchError> {
        let statement = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY,
                name TEXT,
                surname TEXT,
                email TEXT,
                age INTEGER,
                location TEXT,
                country_code TEXT
            )",
            self.table
        );

        sqlx::query(&statement)
            .execute(self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create SQLite table {}: {}", self.table, e);
                BatchError::Database(format!("SQLite table creation failed: {}", e))
            })?;

        info!("SQLite table {} is ready", self.table);
        Ok(())
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn exists(&self, id: i64) -> Result<bool, BatchError> {
        let mut query_builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        query_builder.push(self.table);
        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        let query = query_builder.build_query_scalar::<i64>();
        let count = block_on(query.fetch_one(self.pool)).map_err(|e| {
            error!("Failed to look up customer {} in {}: {}", id, self.table, e);
            BatchError::Database(format!("SQLite lookup failed: {}", e))
        })?;

        Ok(count > 0)
    }

    fn insert(&self, customer: &Customer) -> Result<(), BatchError> {
        let mut query_builder = QueryBuilder::new("INSERT INTO ");
        query_builder.push(self.table);
        query_builder.push(" (");
        query_builder.push(CUSTOMER_COLUMNS.join(","));
        query_builder.push(") ");
        query_builder.push_values(std::iter::once(customer), |b, item| {
            self.binder.bind(item, b);
        });

        let query = query_builder.build();
        block_on(query.execute(self.pool)).map_err(|e| {
            error!(
                "Failed to insert customer {} into {}: {}",
                customer.id, self.table, e
            );
            BatchError::Database(format!("SQLite insert failed: {}", e))
        })?;

        debug!("Inserted customer {} into {}", customer.id, self.table);
        Ok(())
    }
}
