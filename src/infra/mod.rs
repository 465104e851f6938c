pub mod dry_run_notifier;
pub mod http_client;
