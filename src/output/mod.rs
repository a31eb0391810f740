pub mod formatter;

pub use formatter::{
    format_agency_emails, format_agency_json, format_agency_table, format_json, format_markets,
    format_probability, format_result_detail, format_scored_table, format_status, format_tsv,
    should_use_colors, ScoredLead,
};
