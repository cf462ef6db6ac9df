pub mod email_change;
pub mod events;
pub mod notifier;
pub mod signature;
