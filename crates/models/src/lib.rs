pub mod errors;
pub mod db;
pub mod resource;
pub mod translations;
pub mod validation;

pub mod profile;
pub mod credential;
pub mod offering;
pub mod team_member;
pub mod project;
pub mod review;
pub mod blog_post;
pub mod contact_message;
pub mod company_history;
pub mod task;
pub mod site_statistic;

pub use errors::ModelError;
pub use resource::{
    Filter, FilterField, FilterKind, FilterValue, Ordinal, Resource, SortDirection, SortKey, SortValue, Timestamp,
};
pub use translations::Localize;

#[cfg(test)]
mod tests;
