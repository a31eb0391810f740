pub mod intake;
pub mod types;

pub use intake::{
    coerce_budget, load_raw_leads, load_records, parse_raw_leads, parse_records, RawFlag, RawLead,
    RawNumber,
};
pub use types::{LeadAttributes, LeadStatus, MortgageStatus};
