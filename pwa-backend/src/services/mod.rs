pub mod notification_service;
pub mod password;
pub mod subscription_repository;
pub mod user_service;
