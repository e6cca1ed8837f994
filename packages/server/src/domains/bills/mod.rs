// Bills domain: ingested congress.gov bills and their derived status.

pub mod models;
pub mod status;

pub use models::{Bill, BillFilter, NewBill};
pub use status::BillStatus;

/// Human-readable bill identity: `"{congress}-{type}-{number}"`, lowercase type.
pub fn format_bill_id(congress: i32, bill_type: &str, bill_number: i32) -> String {
    format!("{}-{}-{}", congress, bill_type.to_lowercase(), bill_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bill_id() {
        assert_eq!(format_bill_id(119, "HR", 4821), "119-hr-4821");
        assert_eq!(format_bill_id(118, "sjres", 7), "118-sjres-7");
    }
}
