pub mod contact;
pub mod filter;
pub mod modal;
pub mod nav;
pub mod notification;
pub mod prefs;
pub mod reveal;
pub mod typing;
pub mod ui;
