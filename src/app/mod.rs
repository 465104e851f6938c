// Application layer: the check use case and the ports it talks through

pub mod evaluator;
pub mod notifier;
pub mod poller;
pub mod ports;
pub mod watch;
