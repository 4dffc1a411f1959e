//! Mock version of the customer store.
use mockall::mock;

use customer_batch::{
    BatchError,
    customer::{record::Customer, repository::CustomerRepository},
};

mock! {
    pub Repository {}
    impl CustomerRepository for Repository {
        fn exists(&self, id: i64) -> Result<bool, BatchError>;
        fn insert(&self, customer: &Customer) -> Result<(), BatchError>;
    }
}
