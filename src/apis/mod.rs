// Clients for the two remote services: the NCCPA registry and Twilio

pub mod nccpa;
pub mod twilio;
