mod config;
mod data_store;

pub(crate) use config::{
    DB_TABLE_CREDENTIALS, DB_TABLE_REFRESH_TOKENS, DB_TABLE_STUDENT_PROFILES,
    DB_TABLE_USERS, DB_TABLE_VERIFICATION_TOKENS,
};
pub(crate) use data_store::GENERIC_DATA_STORE;
