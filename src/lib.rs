pub mod agency;
pub mod config;
pub mod followup;
pub mod lead;
pub mod notify;
pub mod outreach;
pub mod output;
pub mod scoring;
