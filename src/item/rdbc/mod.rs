use sqlx::{Database, query_builder::Separated};

/// SQLite implementation of the customer repository.
pub mod sqlite_repository;

/// Binds the fields of an item to the values of an `INSERT` statement.
///
/// The order of the bound values must match the column list of the statement.
///
/// # Examples
///
/// ```
/// use customer_batch::item::rdbc::DatabaseItemBinder;
/// use sqlx::{query_builder::Separated, Sqlite};
///
/// struct Tag {
///     id: i64,
///     label: String,
/// }
///
/// struct TagBinder;
/// impl DatabaseItemBinder<Tag, Sqlite> for TagBinder {
///     fn bind(&self, item: &Tag, mut query_builder: Separated<Sqlite, &str>) {
///         query_builder.push_bind(item.id);
///         query_builder.push_bind(item.label.clone());
///     }
/// }
/// ```
pub trait DatabaseItemBinder<O, DB: Database> {
    fn bind(&self, item: &O, query_builder: Separated<DB, &str>);
}

pub use sqlite_repository::{CustomerBinder, SqliteCustomerRepository};
