// Adapters layer: concrete supplier implementations of the domain ports.

pub mod suppliers;

pub use suppliers::{SupplierA, SupplierB, SupplierC, SupplierD, SupplierEndpoint};
