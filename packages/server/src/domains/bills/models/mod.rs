pub mod bill;

pub use bill::{Bill, BillFilter, NewBill};
