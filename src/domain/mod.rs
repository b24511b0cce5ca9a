pub mod classroom;
pub mod dto;
pub mod message;
pub mod quiz;
