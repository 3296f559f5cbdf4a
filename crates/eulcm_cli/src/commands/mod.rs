pub mod add_file;
pub mod create_collection;
pub mod create_mailbox;
pub mod ingest_mail;
pub mod inspect;
pub mod mailbox;
pub mod models;
pub mod show;
pub mod update_cerp;
pub mod validate;
