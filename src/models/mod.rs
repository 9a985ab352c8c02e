pub mod action;
pub mod member;
pub mod role_mapping;
