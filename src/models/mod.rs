//! 数据模型模块

pub mod analytics;
pub mod announcement;
pub mod auth;
pub mod catalog;
pub mod envelope;
pub mod order;
pub mod payment;
pub mod plan;
pub mod restaurant;
pub mod user;

pub use envelope::{ApiResponse, Message};
