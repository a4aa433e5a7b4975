#![allow(dead_code)]

pub mod assertions;
pub mod notifier;
pub mod store;
