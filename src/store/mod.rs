mod datastore;
pub mod migrate;

pub use datastore::DataStore;
