pub mod project;
pub mod skills;
