use std::{cell::RefCell, collections::BTreeMap};

use crate::BatchError;

use super::record::Customer;

/// The customer store as seen by the migration.
///
/// The sink checks [`exists`](CustomerRepository::exists) and then calls
/// [`insert`](CustomerRepository::insert). The two calls are not atomic: two
/// runs importing the same id at the same time can both see it as missing,
/// and the second insert then fails on the primary key. That row is counted
/// as a write error for the step; the other rows of its chunk are still stored.
pub trait CustomerRepository {
    /// Returns whether a customer with `id` is already stored.
    fn exists(&self, id: i64) -> Result<bool, BatchError>;

    /// Stores a new customer.
    fn insert(&self, customer: &Customer) -> Result<(), BatchError>;
}

/// Keeps customers in memory, ordered by id.
///
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RefCell<BTreeMap<i64, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository that already holds `customers`.
    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        Self {
            customers: RefCell::new(
                customers
                    .into_iter()
                    .map(|customer| (customer.id, customer))
                    .collect(),
            ),
        }
    }

    pub fn get(&self, id: i64) -> Option<Customer> {
        self.customers.borrow().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.customers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.borrow().is_empty()
    }

    /// Stored customers, by ascending id.
    pub fn customers(&self) -> Vec<Customer> {
        self.customers.borrow().values().cloned().collect()
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn exists(&self, id: i64) -> Result<bool, BatchError> {
        Ok(self.customers.borrow().contains_key(&id))
    }

    fn insert(&self, customer: &Customer) -> Result<(), BatchError> {
        let mut customers = self.customers.borrow_mut();
        if customers.contains_key(&customer.id) {
            return Err(BatchError::Database(format!(
                "customer {} already exists",
                customer.id
            )));
        }
        customers.insert(customer.id, customer.clone());
        Ok(())
    }
}
