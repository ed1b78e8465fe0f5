//! Infrastructure routes - semesters, groups and membership

pub mod api;

pub use api::{
    api_group_add_member, api_group_create, api_group_delete, api_group_rename, api_groups,
    api_semester_create, api_semester_delete, api_semester_rename, api_semesters,
};
