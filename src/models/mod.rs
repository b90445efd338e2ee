pub mod application;
pub mod behavioral;
pub mod candidate;
pub mod company;
pub mod job;
pub mod notification;
pub mod user;
