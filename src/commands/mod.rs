pub mod bridge;
pub mod device_info;
pub mod notifications;
pub mod permissions;
